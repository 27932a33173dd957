//! 码库存的 CSV 导出
//!
//! Web Admin 与 CLI 共用同一套列：`code,url,created_at`。

use std::io::Write;

use csv::WriterBuilder;
use serde::Serialize;

use crate::errors::{Result, TappioError};
use crate::storage::NfcCode;

/// CSV 行
#[derive(Debug, Clone, Serialize)]
pub struct CodeCsvRow {
    pub code: String,
    pub url: String,
    pub created_at: String,
}

impl CodeCsvRow {
    pub fn from_code(code: &NfcCode, base_url: &str) -> Self {
        Self {
            url: scan_url(base_url, &code.code),
            code: code.code.clone(),
            created_at: code.created_at.to_rfc3339(),
        }
    }
}

/// 扫码地址：`{base}/c/{code}`
pub fn scan_url(base_url: &str, code: &str) -> String {
    format!(
        "{}/c/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(code)
    )
}

/// 把码写入任意 writer
pub fn write_codes_csv<W: Write>(codes: &[NfcCode], base_url: &str, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    for code in codes {
        csv_writer.serialize(CodeCsvRow::from_code(code, base_url))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TappioError::file_operation(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

/// 生成 CSV 字节（HTTP 下载使用）
pub fn codes_to_csv_bytes(codes: &[NfcCode], base_url: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_codes_csv(codes, base_url, &mut buffer)?;
    if codes.is_empty() {
        // 没有数据时也输出表头
        buffer = b"code,url,created_at\n".to_vec();
    }
    Ok(buffer)
}
