//! 宽松 JSON 解码
//!
//! 东方财富部分接口返回 JavaScript 对象字面量而非标准 JSON，例如
//! `({data:["2023年09月份,..."],pages:1})`。这里支持：
//! - 未加引号的键名
//! - 单引号字符串
//! - 数组和对象末尾多余的逗号
//! - `undefined` / `NaN` / `Infinity` 作为 null

use anyhow::{anyhow, bail, Result};
use serde_json::{Map, Number, Value};

/// 对象和数组的最大嵌套层数，与 serde_json 一致
const MAX_DEPTH: usize = 128;

/// 解码宽松格式文本为 serde_json::Value
pub fn decode(text: &str) -> Result<Value> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos < parser.chars.len() {
        bail!("第 {} 个字符后存在多余内容", parser.pos);
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '\u{feff}' {
                self.pos += 1;
            } else if c == '/' && self.chars.get(self.pos + 1) == Some(&'/') {
                while let Some(c) = self.next_char() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if c == '/' && self.chars.get(self.pos + 1) == Some(&'*') {
                self.pos += 2;
                while self.pos < self.chars.len() {
                    if self.chars[self.pos] == '*' && self.chars.get(self.pos + 1) == Some(&'/') {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next_char() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(anyhow!("位置 {} 期望 {:?}，实际为 {:?}", self.pos - 1, expected, c)),
            None => Err(anyhow!("期望 {:?}，但文本已结束", expected)),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('{') => self.nested(Self::parse_object),
            Some('[') => self.nested(Self::parse_array),
            Some(q @ ('"' | '\'')) => self.parse_string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let word = self.parse_identifier();
                Ok(match word.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" | "undefined" | "NaN" | "Infinity" => Value::Null,
                    _ => Value::String(word),
                })
            }
            Some(c) => Err(anyhow!("位置 {} 出现无法识别的字符 {:?}", self.pos, c)),
            None => Err(anyhow!("文本意外结束")),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            bail!("位置 {} 嵌套超过 {} 层", self.pos, MAX_DEPTH);
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                None => bail!("对象未闭合"),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_ws();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                Some(c) => bail!("对象中位置 {} 出现意外字符 {:?}", self.pos - 1, c),
                None => bail!("对象未闭合"),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_string(q),
            Some(c) if is_ident_start(c) || c.is_ascii_digit() => {
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if is_ident_part(c) {
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            Some(c) => bail!("位置 {} 无法解析键名 {:?}", self.pos, c),
            None => bail!("键名缺失"),
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                None => bail!("数组未闭合"),
                _ => {}
            }

            items.push(self.parse_value()?);

            self.skip_ws();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                Some(c) => bail!("数组中位置 {} 出现意外字符 {:?}", self.pos - 1, c),
                None => bail!("数组未闭合"),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        self.expect(quote)?;
        let mut out = String::new();

        loop {
            let c = self.next_char().ok_or_else(|| anyhow!("字符串未闭合"))?;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.next_char().ok_or_else(|| anyhow!("字符串未闭合"))?;
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'u' => out.push(self.parse_unicode_escape()?),
                // \" \' \\ \/ 以及其他字符原样保留
                other => out.push(other),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let high = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&high)
            && self.chars.get(self.pos) == Some(&'\\')
            && self.chars.get(self.pos + 1) == Some(&'u')
        {
            self.pos += 2;
            let low = self.read_hex4()?;
            let code = 0x10000 + ((high - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF);
            return char::from_u32(code).ok_or_else(|| anyhow!("非法的代理对"));
        }
        char::from_u32(high).ok_or_else(|| anyhow!("非法的 Unicode 转义 {:04x}", high))
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let end = self.pos + 4;
        if end > self.chars.len() {
            bail!("Unicode 转义不完整");
        }
        let hex: String = self.chars[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&hex, 16).map_err(|_| anyhow!("非法的 Unicode 转义 {}", hex))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let lexeme = lexeme.strip_prefix('+').unwrap_or(&lexeme);

        if let Ok(n) = lexeme.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        let f = lexeme
            .parse::<f64>()
            .map_err(|_| anyhow!("无法解析数值 {:?}", lexeme))?;
        Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null))
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_part(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
