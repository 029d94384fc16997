/// Render seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours; a 2-hour meal shows as `120:00`.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
