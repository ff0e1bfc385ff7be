//! Size statistics shared by results and reports.

/// Percentage reduction in byte size from source to result.
///
/// Rounded to the nearest integer and clamped to 0 when the original is
/// empty. Negative when the result grew; callers display "no change" for
/// anything at or below zero.
pub fn compression_ratio(original_size: u64, output_size: u64) -> i32 {
    if original_size == 0 {
        return 0;
    }
    let saved = original_size as f64 - output_size as f64;
    (saved / original_size as f64 * 100.0).round() as i32
}

/// Formats a byte count as B/KB/MB/GB for logs and reports.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ratio_is_zero_for_empty_original() {
        assert_eq!(compression_ratio(0, 0), 0);
        assert_eq!(compression_ratio(0, 500), 0);
    }

    #[test]
    fn ratio_rounds_to_nearest_percent() {
        assert_eq!(compression_ratio(1000, 500), 50);
        assert_eq!(compression_ratio(3, 2), 33);
        assert_eq!(compression_ratio(3, 1), 67);
        assert_eq!(compression_ratio(1000, 1000), 0);
    }

    #[test]
    fn ratio_goes_negative_when_output_grows() {
        assert_eq!(compression_ratio(1000, 1100), -10);
        assert_eq!(compression_ratio(100, 250), -150);
    }

    #[test]
    fn formats_byte_counts() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    proptest! {
        #[test]
        fn ratio_never_exceeds_one_hundred(original in 1u64..u32::MAX as u64, output in 0u64..u32::MAX as u64) {
            prop_assert!(compression_ratio(original, output) <= 100);
        }

        #[test]
        fn ratio_sign_tracks_size_change(original in 1u64..u32::MAX as u64, output in 0u64..u32::MAX as u64) {
            let ratio = compression_ratio(original, output);
            if output <= original {
                prop_assert!(ratio >= 0);
            } else {
                prop_assert!(ratio <= 0);
            }
        }

        #[test]
        fn identical_sizes_are_zero(size in 0u64..u32::MAX as u64) {
            prop_assert_eq!(compression_ratio(size, size), 0);
        }
    }
}
