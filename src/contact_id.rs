// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact-ID event code lookup. Alarm events carry a four-digit `Cid`
//! code (Ademco Contact-ID); this maps the codes the panel is known to
//! emit to a human-readable description.

/// `(code, description)` pairs, in the panel's own listing order.
const TABLE: &[(&str, &str)] = &[
    ("1100", "Personal ambulance"),
    ("1101", "Emergency"),
    ("1110", "Fire"),
    ("1120", "Emergency"),
    ("1131", "Perimeter"),
    ("1132", "Burglary"),
    ("1133", "24 hour"),
    ("1134", "Delay"),
    ("1137", "Dismantled"),
    ("1301", "System AC fault"),
    ("1302", "System battery failure"),
    ("1306", "Programming changes"),
    ("1350", "Communication failure"),
    ("1351", "Telephone line fault"),
    ("1370", "Circuit fault"),
    ("1381", "Detector lost"),
    ("1384", "Low battery detector"),
    ("1401", "Disarm report"),
    ("1406", "Alarm canceled"),
    ("1455", "Automatic arming failed"),
    ("1570", "Bypass Report"),
    ("1601", "Manual communication test reports"),
    ("1602", "Communications test reports"),
    ("3301", "System AC recovery"),
    ("3302", "System battery recovery"),
    ("3350", "Communication resumes"),
    ("3351", "Telephone line to restore"),
    ("3370", "Loop recovery"),
    ("3381", "Detector loss recovery"),
    ("3384", "Detector low voltage recovery"),
    ("3401", "Arming Report"),
    ("3441", "Staying Report"),
    ("3570", "Bypass recovery"),
];

/// Look up a description for a four-digit Contact-ID code such as `"1132"`.
/// Returns `None` for codes not in the panel's own table.
pub fn describe(code: &str) -> Option<&'static str> {
    TABLE.iter().find(|(c, _)| *c == code).map(|(_, desc)| *desc)
}
