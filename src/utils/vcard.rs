//! vCard 3.0 生成

use crate::storage::Profile;

/// 按 RFC 6350 转义文本值
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// 生成资料的 vCard 文本，行尾为 CRLF
pub fn render_vcard(profile: &Profile) -> String {
    let field = |value: &Option<String>| escape(value.as_deref().unwrap_or(""));

    let lines = [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", field(&profile.full_name)),
        format!("ORG:{}", field(&profile.company)),
        format!("TITLE:{}", field(&profile.job_title)),
        format!("TEL:{}", field(&profile.phone)),
        format!("EMAIL:{}", field(&profile.email)),
        format!("URL:{}", field(&profile.website)),
        format!("NOTE:{}", field(&profile.bio)),
        "END:VCARD".to_string(),
    ];

    let mut card = lines.join("\r\n");
    card.push_str("\r\n");
    card
}

/// 下载文件名：`{full_name}.vcf`，缺省为 `contact.vcf`
///
/// 结果会放进 Content-Disposition，去掉引号、路径分隔符和所有控制字符。
pub fn vcard_filename(profile: &Profile) -> String {
    let name: String = profile
        .full_name
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '/' | '\\'))
        .collect();
    match name.trim() {
        "" => "contact.vcf".to_string(),
        name => format!("{}.vcf", name),
    }
}
