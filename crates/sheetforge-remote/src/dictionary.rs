//! Built-in Japanese-to-English dictionary of common spreadsheet header
//! terms. Consulted before any translation-service call; entries map header
//! text to plain English phrases that the identifier builder then camelizes.

use once_cell::sync::Lazy;

/// Ordered pairs so substring matching is deterministic; longer and more
/// specific terms come before their fragments.
pub static HEADER_DICTIONARY: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("ID", "id"),
        ("作成日時", "created at"),
        ("更新日時", "updated at"),
        ("作成日", "created at"),
        ("更新日", "updated at"),
        ("名前", "name"),
        ("氏名", "full name"),
        ("タイトル", "title"),
        ("件名", "subject"),
        ("説明", "description"),
        ("備考", "notes"),
        ("状態", "status"),
        ("ステータス", "status"),
        ("完了", "done"),
        ("優先度", "priority"),
        ("期限", "due date"),
        ("日付", "date"),
        ("担当者", "assignee"),
        ("カテゴリ", "category"),
        ("タグ", "tag"),
        ("金額", "amount"),
        ("価格", "price"),
        ("数量", "quantity"),
        ("メールアドレス", "email"),
        ("メール", "email"),
        ("電話番号", "phone number"),
        ("住所", "address"),
        ("URL", "url"),
    ]
});

/// Exact match against the extension entries first, then the built-ins.
pub fn exact_lookup<'a>(term: &str, extra: &'a [(String, String)]) -> Option<&'a str> {
    if let Some((_, value)) = extra.iter().find(|(key, _)| key == term) {
        return Some(value.as_str());
    }
    HEADER_DICTIONARY
        .iter()
        .find(|(key, _)| *key == term)
        .map(|(_, value)| *value)
}

/// Containment match: the first dictionary key appearing inside `term`.
pub fn substring_lookup<'a>(term: &str, extra: &'a [(String, String)]) -> Option<&'a str> {
    if let Some((_, value)) = extra.iter().find(|(key, _)| term.contains(key.as_str())) {
        return Some(value.as_str());
    }
    HEADER_DICTIONARY
        .iter()
        .find(|(key, _)| term.contains(key))
        .map(|(_, value)| *value)
}
