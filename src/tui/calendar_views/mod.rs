pub mod calendar_list;
pub mod event_list;
pub mod month;
pub mod week;

/// Pads or cuts `text` to exactly `width` columns.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}
