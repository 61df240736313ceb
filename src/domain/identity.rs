// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 卡组标识生成
//!
//! 标识只取 SHA-224 摘要的前 8 位十六进制字符（32 位），不做碰撞检测。

use sha2::{Digest, Sha224};

/// 标识长度（十六进制字符数）
pub const DECK_ID_LEN: usize = 8;

const FIELD_SEPARATOR: char = '|';

fn normalize(value: &str) -> String {
    value.replace(['\n', '\r'], "").trim().to_string()
}

/// 计算卡组标识
///
/// 选手和赛事去掉换行与首尾空白，日期保持原样，以 `|` 连接后取摘要
pub fn deck_id(player: &str, date: &str, event: &str) -> String {
    let composite = format!(
        "{}{sep}{}{sep}{}",
        normalize(player),
        date,
        normalize(event),
        sep = FIELD_SEPARATOR
    );

    let digest = Sha224::digest(composite.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(DECK_ID_LEN);
    id
}
