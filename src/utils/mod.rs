// 工具模組

mod logger;

pub use logger::init_logger;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// 讀取檔案並解碼成字串
///
/// encoding_rs 的 BOM 偵測：UTF-8/UTF-16 BOM 依 BOM 解碼，
/// 其餘一律當 UTF-8，壞掉的位元組以替換字元帶過（不報錯）
pub fn read_to_string_lossy(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read `{}`", path.display()))?;
    let (text, _encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        log::warn!(
            "`{}`: invalid byte sequences replaced during decode",
            path.display()
        );
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_read_utf8_with_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xef\xbb\xbfwire w;").unwrap();
        let text = read_to_string_lossy(file.path()).unwrap();
        // BOM 被剝掉
        assert_eq!(text, "wire w;");
    }

    #[test]
    fn test_read_invalid_bytes_lossy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"wire \xff w;").unwrap();
        let text = read_to_string_lossy(file.path()).unwrap();
        assert!(text.starts_with("wire "));
        assert!(text.contains('\u{fffd}'));
    }

    #[test]
    fn test_read_missing_file_is_error() {
        assert!(read_to_string_lossy(Path::new("/no/such/file.sv")).is_err());
    }
}
