//! Data Graph Query Module
//!
//! データグラフAPIとのやり取りに使う値型を定義するモジュール。
//! HTTP通信自体は行わず、接続先の組み立て・問い合わせ文字列の生成・
//! 応答（JSON / XMLテーブル）の解析のみを提供します。

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::SheetXmlError;
use crate::types::{Row, TabularData, Value};

/// JavaScriptの`encodeURIComponent`がエスケープしない文字を除いた集合
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const DEFAULT_SERVER_URL: &str = "http://localhost";
pub const DEFAULT_SERVER_PORT: &str = "3001";

pub const DEFAULT_BUILD_LINE: &str = "254";
pub const DEFAULT_MARKET: &str = "USA/CND";
pub const DEFAULT_GRAPH_PROPERTY: &str = "H101 Fahrzeughöhe (M1 ~ ff) (mm)";

/// サーバー接続設定
///
/// 生成後に変更されない値として、通信層に明示的に渡して使用します。
///
/// # JSONからの読み込み
///
/// ```rust
/// use sheetxml::query::ServerConfig;
///
/// # fn main() -> Result<(), sheetxml::SheetXmlError> {
/// let config = ServerConfig::from_json(
///     r#"{"mode": "cors_proxy", "proxy": "https://corsproxy.io/?", "url": "http://10.0.0.5", "port": "3001"}"#,
/// )?;
/// assert_eq!(config.api_url(), "https://corsproxy.io/?http://10.0.0.5:3001");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ServerConfig {
    /// サーバーへ直接接続
    Direct { url: String, port: String },

    /// ngrokなどのフォワーディングURL経由（ポート指定なし）
    Ngrok { url: String },

    /// CORSプロキシを前置して接続
    CorsProxy {
        proxy: String,
        url: String,
        port: String,
    },
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig::Direct {
            url: DEFAULT_SERVER_URL.to_string(),
            port: DEFAULT_SERVER_PORT.to_string(),
        }
    }
}

impl ServerConfig {
    /// JSONから設定を読み込み、検証する
    pub fn from_json(json: &str) -> Result<Self, SheetXmlError> {
        let config: ServerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// APIのベースURL
    ///
    /// - `Direct`: `url:port`
    /// - `Ngrok`: `url`（末尾の`/`を除く）
    /// - `CorsProxy`: `proxy` + `url:port`
    pub fn api_url(&self) -> String {
        match self {
            ServerConfig::Direct { url, port } => format!("{}:{}", url, port),
            ServerConfig::Ngrok { url } => url.trim_end_matches('/').to_string(),
            ServerConfig::CorsProxy { proxy, url, port } => format!("{}{}:{}", proxy, url, port),
        }
    }

    /// エンドポイントのURL（例: `endpoint("health")`）
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 設定値を検証する
    ///
    /// # 発生し得るエラー
    ///
    /// * `SheetXmlError::Config(String)`:
    ///   * URLが空、または`http://` / `https://`で始まらない
    ///   * ポートが0〜65535の数値でない
    pub fn validate(&self) -> Result<(), SheetXmlError> {
        match self {
            ServerConfig::Direct { url, port } => {
                validate_http_url("server url", url)?;
                validate_port(port)
            }
            ServerConfig::Ngrok { url } => validate_http_url("ngrok url", url),
            ServerConfig::CorsProxy { proxy, url, port } => {
                validate_http_url("cors proxy", proxy)?;
                validate_http_url("server url", url)?;
                validate_port(port)
            }
        }
    }
}

fn validate_http_url(field: &str, url: &str) -> Result<(), SheetXmlError> {
    if url.is_empty() {
        return Err(SheetXmlError::Config(format!("{} must not be empty", field)));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SheetXmlError::Config(format!(
            "{} must start with http:// or https://: '{}'",
            field, url
        )));
    }
    Ok(())
}

fn validate_port(port: &str) -> Result<(), SheetXmlError> {
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| SheetXmlError::Config(format!("Invalid port: '{}'", port)))
}

/// データグラフの問い合わせパラメーター
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub build_line: String,
    pub market: String,
    pub graph_property: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            build_line: DEFAULT_BUILD_LINE.to_string(),
            market: DEFAULT_MARKET.to_string(),
            graph_property: DEFAULT_GRAPH_PROPERTY.to_string(),
        }
    }
}

impl QueryParams {
    /// すべてのパラメーターが入力されているかどうか
    pub fn is_complete(&self) -> bool {
        !self.build_line.is_empty() && !self.market.is_empty() && !self.graph_property.is_empty()
    }

    /// 問い合わせ文字列
    ///
    /// ```rust
    /// use sheetxml::query::QueryParams;
    ///
    /// let params = QueryParams::default();
    /// assert_eq!(
    ///     params.to_query_string(),
    ///     "build_line=254&market=USA%2FCND&graph_property=H101%20Fahrzeugh%C3%B6he%20(M1%20~%20ff)%20(mm)"
    /// );
    /// ```
    pub fn to_query_string(&self) -> String {
        format!(
            "build_line={}&market={}&graph_property={}",
            utf8_percent_encode(&self.build_line, URI_COMPONENT),
            utf8_percent_encode(&self.market, URI_COMPONENT),
            utf8_percent_encode(&self.graph_property, URI_COMPONENT),
        )
    }
}

/// サーバー応答の生の形式
#[derive(Debug, Deserialize)]
struct RawResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// サーバー応答
///
/// `{ "success": bool, "message": string, "data"?: any }`形式の応答を
/// 成功と失敗のいずれかとして表現します。
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResponse {
    Success { data: serde_json::Value },
    Failure { message: String },
}

impl QueryResponse {
    /// JSON応答を解析する
    pub fn from_json(json: &str) -> Result<Self, SheetXmlError> {
        let raw: RawResponse = serde_json::from_str(json)?;
        if raw.success {
            Ok(QueryResponse::Success {
                data: raw.data.unwrap_or(serde_json::Value::Null),
            })
        } else {
            Ok(QueryResponse::Failure {
                message: raw.message,
            })
        }
    }

    /// 成功時のデータを取り出す
    pub fn into_result(self) -> Result<serde_json::Value, SheetXmlError> {
        match self {
            QueryResponse::Success { data } => Ok(data),
            QueryResponse::Failure { message } => Err(SheetXmlError::Query(message)),
        }
    }

    /// 成功時のデータ（XMLテーブル文字列）を表形式データとして解析する
    pub fn into_table(self) -> Result<TabularData, SheetXmlError> {
        match self.into_result()? {
            serde_json::Value::String(xml) => parse_xml_table(&xml),
            other => Err(SheetXmlError::Query(format!(
                "Expected XML table string in response data, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// ヘルスチェック応答を解析する
///
/// `{"health": true}`の場合のみ`true`。解析に失敗した場合は`false`を返します。
pub fn parse_health_response(json: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => value.get("health") == Some(&serde_json::Value::Bool(true)),
        Err(e) => {
            tracing::debug!(error = %e, "health response is not valid JSON");
            false
        }
    }
}

/// XMLテーブルを表形式データに変換する
///
/// - ヘッダー: `thead`配下のすべての`entry`のテキスト
/// - 行: `tbody`配下の各`row`。`row`内の`entry`を同じ位置のヘッダーに対応付ける
///   （ヘッダー数を超える`entry`は無視）
///
/// # 入力例
///
/// ```xml
/// <table>
///   <thead><row><entry>Model</entry><entry>Height</entry></row></thead>
///   <tbody><row><entry>W206</entry><entry>1440</entry></row></tbody>
/// </table>
/// ```
pub fn parse_xml_table(xml: &str) -> Result<TabularData, SheetXmlError> {
    // entry内の前後の空白は値の一部として保持する（entry外のテキストは無視）
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut in_thead = false;
    let mut in_tbody = false;
    let mut current_row: Option<Vec<String>> = None;
    let mut current_entry: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"thead" => in_thead = true,
                b"tbody" => in_tbody = true,
                b"row" if in_tbody && current_row.is_none() => current_row = Some(Vec::new()),
                b"entry" if current_entry.is_none() && (in_thead || current_row.is_some()) => {
                    current_entry = Some(String::new())
                }
                _ => {}
            },
            // <entry/> は空文字列
            Ok(Event::Empty(e)) => {
                if e.name().as_ref() == b"entry" && current_entry.is_none() {
                    if let Some(row) = current_row.as_mut() {
                        row.push(String::new());
                    } else if in_thead {
                        headers.push(String::new());
                    }
                } else if e.name().as_ref() == b"row" && in_tbody && current_row.is_none() {
                    rows.push(Vec::new());
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(entry) = current_entry.as_mut() {
                    entry.push_str(&e.unescape()?);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(entry) = current_entry.as_mut() {
                    entry.push_str(std::str::from_utf8(&e)?);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"thead" => in_thead = false,
                b"tbody" => in_tbody = false,
                b"row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                b"entry" => {
                    if let Some(text) = current_entry.take() {
                        if let Some(row) = current_row.as_mut() {
                            row.push(text);
                        } else if in_thead {
                            headers.push(text);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SheetXmlError::Xml(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    let rows: Vec<Row> = rows
        .into_iter()
        .map(|entries| {
            let mut row = Row::new();
            for (header, text) in headers.iter().zip(entries) {
                row.insert(header.as_str(), Value::String(text));
            }
            row
        })
        .collect();

    tracing::debug!(headers = headers.len(), rows = rows.len(), "parsed XML table");

    Ok(TabularData::new(headers, rows))
}
