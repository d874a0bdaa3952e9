//! Renderer tests through the public API.

use poison_demo::db::text_cell;
use poison_demo::render::{classify, render_header, render_row, BinaryEncoding, TableWriter};
use pretty_assertions::assert_eq;

#[test]
fn test_user_table_hex_and_base64() {
    let row = vec![text_cell("1"), text_cell("bob"), None, Some(vec![0xff, 0xfe])];

    assert_eq!(
        render_header(&["id", "username", "password", "email"]),
        "id\tusername\tpassword\temail\n---\t---\t---\t---"
    );
    assert_eq!(render_row(&row, BinaryEncoding::Hex), "1\tbob\t<NULL>\t0xfffe");
    assert_eq!(
        render_row(&row, BinaryEncoding::Base64Url),
        "1\tbob\t<NULL>\t__4="
    );
}

#[test]
fn test_every_single_byte_is_renderable() {
    for byte in 0..=255u8 {
        for encoding in [BinaryEncoding::Hex, BinaryEncoding::Base64Url] {
            let bytes = [byte];
            let rendered = classify(&bytes, encoding);
            if byte.is_ascii() {
                assert_eq!(rendered.as_bytes(), [byte]);
            } else {
                assert!(!rendered.contains('\t') && !rendered.contains('\n'));
            }
        }
    }
}

#[test]
fn test_table_writer_into_stdout_like_sink() {
    let mut sink = Vec::new();
    {
        let mut writer = TableWriter::new(&mut sink, BinaryEncoding::Base64Url);
        writer.write_header(&["email"]).unwrap();
        writer.write_row(&[Some(vec![0xfb, 0xff])]).unwrap();
        writer.finish().unwrap();
    }
    assert_eq!(String::from_utf8(sink).unwrap(), "email\n---\n-_8=\n");
}
