use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const CAPTURE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Reads the EXIF `DateTimeOriginal` field of the primary image.
///
/// `Ok(None)` means the container parsed but carries no usable capture time.
pub fn read_capture_time(path: &Path) -> Result<Option<NaiveDateTime>> {
    let file = File::open(path)
        .with_context(|| format!("EXIF読み込み対象を開けませんでした: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("EXIFを解析できませんでした: {}", path.display()))?;

    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return Ok(None);
    };

    Ok(first_ascii(&field.value).and_then(parse_capture_time))
}

pub fn parse_capture_time(raw: &str) -> Option<NaiveDateTime> {
    let normalized = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    NaiveDateTime::parse_from_str(normalized, CAPTURE_TIME_FORMAT).ok()
}

fn first_ascii(value: &Value) -> Option<&str> {
    match value {
        Value::Ascii(parts) => parts
            .first()
            .and_then(|bytes| std::str::from_utf8(bytes).ok()),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{parse_capture_time, read_capture_time};
    use chrono::NaiveDate;
    use exif::experimental::Writer;
    use exif::{Field, In, Tag, Value};
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    /// Writes a minimal TIFF whose primary IFD carries `DateTimeOriginal`.
    pub(crate) fn write_tiff_with_capture_time(path: &Path, raw: &str) {
        let field = Field {
            tag: Tag::DateTimeOriginal,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![raw.as_bytes().to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).expect("write tiff");
        fs::write(path, buf.into_inner()).expect("save tiff");
    }

    #[test]
    fn parse_capture_time_accepts_exif_format() {
        let parsed = parse_capture_time("2021:05:01 09:30:15").expect("valid");
        let expected = NaiveDate::from_ymd_opt(2021, 5, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 15))
            .expect("date");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_capture_time_ignores_padding() {
        assert!(parse_capture_time(" 2021:05:01 09:30:15\0").is_some());
    }

    #[test]
    fn parse_capture_time_rejects_other_formats() {
        assert!(parse_capture_time("2021-05-01 09:30:15").is_none());
        assert!(parse_capture_time("0000:00:00 00:00:00").is_none());
        assert!(parse_capture_time("").is_none());
    }

    #[test]
    fn read_capture_time_from_tiff() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("scan.tiff");
        write_tiff_with_capture_time(&path, "2019:12:31 23:59:58");

        let parsed = read_capture_time(&path).expect("exif should parse");
        assert_eq!(
            parsed.map(|d| d.format("%Y%m%d%H%M%S").to_string()),
            Some("20191231235958".to_string())
        );
    }

    #[test]
    fn read_capture_time_fails_for_non_image() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").expect("write");

        let err = read_capture_time(&path).expect_err("corrupt file should fail");
        assert!(err.to_string().contains("EXIFを解析できませんでした"));
    }
}
