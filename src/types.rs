//! Types Module
//!
//! 表形式データモデル（ヘッダー・行・プレビュー）を定義するモジュール。
//! ワークブックの解析結果とXML出力の間で受け渡される唯一のデータ構造です。

use indexmap::IndexMap;
use std::fmt;

/// プレビューとして保持する先頭行数
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// セルの値を表す列挙型
///
/// 表計算ソフトのセルから得られるスカラー値です。
/// `Display`実装がXML出力時の文字列化（寛容なデフォルト変換）を担います。
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),
}

impl fmt::Display for Value {
    /// 数値はロケール書式や指数表記を使わない十進表記で出力します。
    ///
    /// - `42.0` → `42`
    /// - `3.5` → `3.5`
    /// - `NaN` → `NaN`、`∞` → `Infinity`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) if n.is_infinite() => {
                if n.is_sign_positive() {
                    f.write_str("Infinity")
                } else {
                    f.write_str("-Infinity")
                }
            }
            // -0.0 は "-0" ではなく "0"
            Value::Number(n) if *n == 0.0 => f.write_str("0"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// 1行分のレコード（ヘッダー名 → 値）
///
/// キーの挿入順を保持します。すべてのヘッダーを含む必要はなく、
/// 存在しないキーは「値なし」として扱われます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: IndexMap<String, Value>,
}

impl Row {
    /// 空の行を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// ヘッダー名に対応する値を取得
    pub fn get(&self, header: &str) -> Option<&Value> {
        self.cells.get(header)
    }

    /// 値を設定（既存の値は置き換える）
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(header.into(), value.into());
    }

    /// 値を設定（既にキーが存在する場合は何もしない）
    ///
    /// 重複したヘッダー名を持つ列では、最初の値が採用されます。
    ///
    /// # 戻り値
    ///
    /// * `true` - 値を設定した場合
    /// * `false` - 既存の値を保持した場合
    pub fn insert_first(&mut self, header: impl Into<String>, value: impl Into<Value>) -> bool {
        match self.cells.entry(header.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(value.into());
                true
            }
        }
    }

    /// 値を持つキーの数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 値を1つも持たないかどうか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// (ヘッダー名, 値) を挿入順に走査
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// 表形式データ
///
/// ワークブックの1シート（またはデータグラフの問い合わせ結果）を
/// ヘッダー列と行のリストとして表現します。生成後は不変です。
///
/// # 不変条件
///
/// `preview_rows`は常に`rows`の先頭`min(5, rows.len())`行と一致します。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularData {
    headers: Vec<String>,
    rows: Vec<Row>,
    preview_rows: Vec<Row>,
}

impl TabularData {
    /// ヘッダーと行から表形式データを生成し、プレビューを導出する
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let preview_rows = rows.iter().take(PREVIEW_ROW_LIMIT).cloned().collect();
        Self {
            headers,
            rows,
            preview_rows,
        }
    }

    /// 列名（出現順）
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// すべての行
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// 先頭5行のプレビュー
    pub fn preview_rows(&self) -> &[Row] {
        &self.preview_rows
    }

    /// 行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// プレビューに収まらない行があるかどうか
    pub fn is_truncated(&self) -> bool {
        self.rows.len() > self.preview_rows.len()
    }

    /// ヘッダーが存在するかどうか
    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}
