/// 朴素子串计数 O(n·m)，仅作为反向搜索的计时基线与校验参照。
/// 重叠出现分别计数；空模式按反向搜索的约定返回 len + 1。
pub fn count_occurrences(text: &[u8], pattern: &[u8]) -> usize {
    if pattern.is_empty() {
        return text.len() + 1;
    }
    if pattern.len() > text.len() {
        return 0;
    }
    text.windows(pattern.len()).filter(|w| *w == pattern).count()
}

/// 所有匹配的起始位置，升序
pub fn find_occurrences(text: &[u8], pattern: &[u8]) -> Vec<u32> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return Vec::new();
    }
    text.windows(pattern.len())
        .enumerate()
        .filter(|(_, w)| *w == pattern)
        .map(|(i, _)| i as u32)
        .collect()
}
