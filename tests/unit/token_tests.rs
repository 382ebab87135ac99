use std::collections::HashSet;

use waitline::queue::generate_token;

#[test]
fn tokens_are_32_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(token.chars().all(|c| !c.is_ascii_uppercase()));
}

#[test]
fn tokens_are_unique() {
    let tokens: HashSet<String> = (0..200).map(|_| generate_token()).collect();
    assert_eq!(tokens.len(), 200);
}

#[test]
fn tokens_are_url_safe() {
    for _ in 0..50 {
        let token = generate_token();
        assert!(token.chars().all(char::is_alphanumeric));
    }
}
