//! Selection Module
//!
//! XMLに出力するヘッダー（パラメーター）の順序付き選択を管理するモジュール。

use crate::types::TabularData;

/// 出力対象ヘッダーの順序付き選択
///
/// 選択順がXMLタグの出力順になります。重複は検査しません
/// （重複したエントリはそのまま重複したタグになります）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    headers: Vec<String>,
}

impl Selection {
    /// 空の選択を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// すべてのヘッダーを出現順に選択
    pub fn all<S: AsRef<str>>(headers: &[S]) -> Self {
        headers.iter().map(|h| h.as_ref().to_string()).collect()
    }

    /// ヘッダーの選択状態を切り替える
    ///
    /// 選択済みであればすべての出現を取り除き、未選択であれば末尾に追加します。
    ///
    /// # 戻り値
    ///
    /// * `true` - 選択に追加した場合
    /// * `false` - 選択から取り除いた場合
    pub fn toggle(&mut self, header: &str) -> bool {
        if self.contains(header) {
            self.headers.retain(|h| h != header);
            false
        } else {
            self.headers.push(header.to_string());
            true
        }
    }

    /// すべての選択を解除
    pub fn clear(&mut self) {
        self.headers.clear();
    }

    pub fn contains(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.headers
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(String::as_str)
    }

    /// 表形式データのヘッダーに存在しない選択エントリ
    ///
    /// 該当するエントリはXML上で常に空要素になります。
    pub fn unknown_headers<'a>(&'a self, data: &TabularData) -> Vec<&'a str> {
        self.iter().filter(|h| !data.has_header(h)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            headers: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl AsRef<[String]> for Selection {
    fn as_ref(&self) -> &[String] {
        &self.headers
    }
}
