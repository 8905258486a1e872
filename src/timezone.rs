// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timezone ordinal lookup for `GetTime`/`SetTime`'s `Type` field, which
//! the panel encodes as a small integer index rather than an offset.

/// `(ordinal, UTC offset label)` pairs, in the panel's own listing order.
const TABLE: &[(u32, &str)] = &[
    (0, "GMT-12:00"),
    (1, "GMT-11:00"),
    (2, "GMT-10:00"),
    (3, "GMT-09:00"),
    (4, "GMT-08:00"),
    (5, "GMT-07:00"),
    (6, "GMT-06:00"),
    (7, "GMT-05:00"),
    (8, "GMT-04:00"),
    (9, "GMT-03:30"),
    (10, "GMT-03:00"),
    (11, "GMT-02:00"),
    (12, "GMT-01:00"),
    (13, "GMT"),
    (14, "GMT+01:00"),
    (15, "GMT+02:00"),
    (16, "GMT+03:00"),
    (17, "GMT+04:00"),
    (18, "GMT+05:00"),
    (19, "GMT+05:30"),
    (20, "GMT+05:45"),
    (21, "GMT+06:00"),
    (22, "GMT+06:30"),
    (23, "GMT+07:00"),
    (24, "GMT+08:00"),
    (25, "GMT+09:00"),
    (26, "GMT+09:30"),
    (27, "GMT+10:00"),
    (28, "GMT+11:00"),
    (29, "GMT+12:00"),
    (30, "GMT+13:00"),
];

/// Look up the UTC offset label for a panel timezone ordinal.
pub fn describe(ordinal: u32) -> Option<&'static str> {
    TABLE.iter().find(|(o, _)| *o == ordinal).map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_zero_is_gmt_minus_12() {
        assert_eq!(describe(0), Some("GMT-12:00"));
    }

    #[test]
    fn ordinal_thirteen_is_gmt() {
        assert_eq!(describe(13), Some("GMT"));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(describe(99), None);
    }
}
