/// Canonical key for the thread between two participants.
///
/// The ids are sorted byte-wise and joined with `_`, so the key does not
/// depend on who is sending. Ids are not escaped: `("a_b", "c")` and
/// `("a", "b_c")` share a key.
pub fn conversation_key(id1: &str, id2: &str) -> String {
    let (first, second) = if id1 <= id2 { (id1, id2) } else { (id2, id1) };
    format!("{}_{}", first, second)
}
