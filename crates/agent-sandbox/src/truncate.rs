//! Output truncation for model consumption

use std::borrow::Cow;

/// Outputs longer than this many characters are truncated
pub const MAX_OUTPUT_CHARS: usize = 20_000;

/// Characters kept from the start of a truncated output
pub const HEAD_CHARS: usize = 5_000;

/// Characters kept from the end of a truncated output
pub const TAIL_CHARS: usize = 15_000;

/// Shorten `text` to a head and tail slice when it exceeds
/// [`MAX_OUTPUT_CHARS`]
///
/// The result is the first [`HEAD_CHARS`] characters, a marker stating how
/// many characters were dropped, then the last [`TAIL_CHARS`] characters.
/// Lengths are counted in characters, so multi-byte text is never split.
pub fn truncate_output(text: &str) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= MAX_OUTPUT_CHARS {
        return Cow::Borrowed(text);
    }

    let omitted = total - HEAD_CHARS - TAIL_CHARS;
    let head_end = byte_offset(text, HEAD_CHARS);
    let tail_start = byte_offset(text, total - TAIL_CHARS);

    Cow::Owned(format!(
        "{}\n\n... [{omitted} chars truncated] ...\n\n{}",
        &text[..head_end],
        &text[tail_start..]
    ))
}

/// Byte offset of the `n`th character
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(idx, _)| idx)
}
