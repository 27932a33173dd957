pub mod colors;
pub mod csv_handler;
pub mod ip;
pub mod password;
pub mod qr;
pub mod url_validator;
pub mod vcard;

/// 码使用的字符集：大写字母与数字
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// 把用户输入的码规范化：去掉空白并转为大写
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}
