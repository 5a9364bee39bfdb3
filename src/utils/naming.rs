// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 标识符命名约定转换
//!
//! 在数据库列名（snake_case）与记录字段名（PascalCase）之间互相转换。
//! 两个转换互为近似逆运算：大小写不规则或带前导下划线的输入不保证能原样往返。

/// PascalCase 转 snake_case：`UserName` => `user_name`
///
/// 在每个紧跟非下划线字符之后的大写字母前插入 `_`，最后整体转为小写。
pub fn to_snake_string(s: &str) -> String {
    let mut data = String::with_capacity(s.len() * 2);
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p != '_') {
            data.push('_');
        }
        data.push(c);
        prev = Some(c);
    }

    data.to_ascii_lowercase()
}

/// snake_case 转 PascalCase：`user_name` => `UserName`
///
/// 每段首字母大写后拼接；开头已经是大写字母的部分保持原样。
/// 只有后面紧跟小写字母的下划线会被去掉。
pub fn to_camel_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut data = String::with_capacity(s.len());
    let mut upper_next = false;
    let mut started = false;

    for (i, &c) in chars.iter().enumerate() {
        let mut c = c;
        if !started && c.is_ascii_uppercase() {
            started = true;
        }
        if c.is_ascii_lowercase() && (upper_next || !started) {
            c = c.to_ascii_uppercase();
            upper_next = false;
            started = true;
        }
        if started
            && c == '_'
            && chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase())
        {
            upper_next = true;
            continue;
        }
        data.push(c);
    }

    data
}
