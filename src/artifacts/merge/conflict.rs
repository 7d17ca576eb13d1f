use bytes::{BufMut, Bytes, BytesMut};

pub const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
pub const SEPARATOR_MARKER: &[u8] = b"=======\n";
pub const GIVEN_MARKER: &[u8] = b">>>>>>>\n";

/// Content written for a conflicted path
///
/// A side that is absent contributes nothing. A non-empty side without a
/// trailing newline gets one so every marker starts its own line.
pub fn conflict_content(current: Option<&[u8]>, given: Option<&[u8]>) -> Bytes {
    let mut content = BytesMut::new();

    content.put_slice(CURRENT_MARKER);
    put_side(&mut content, current);
    content.put_slice(SEPARATOR_MARKER);
    put_side(&mut content, given);
    content.put_slice(GIVEN_MARKER);

    content.freeze()
}

fn put_side(content: &mut BytesMut, side: Option<&[u8]>) {
    let Some(side) = side else {
        return;
    };

    content.put_slice(side);
    if !side.is_empty() && !side.ends_with(b"\n") {
        content.put_u8(b'\n');
    }
}
