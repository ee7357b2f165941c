//! Bash ANSI 컬러 상수와 `${NAME}` 플레이스홀더 확장
//!
//! 필터 핸들러는 출력 문자열을 만들 때 이 모듈의 상수를 직접 이어 붙이거나,
//! [`expand_colours`]로 `${GREEN}text${NONE}` 형태의 템플릿을 확장합니다.
//! 확장은 순수 함수이며 엔진 자체는 컬러를 알지 못합니다.

// Bash colours - http://tldp.org/HOWTO/Bash-Prompt-HOWTO/x329.html
//   Black       0;30     Dark Gray     1;30
//   Blue        0;34     Light Blue    1;34
//   Green       0;32     Light Green   1;32
//   Cyan        0;36     Light Cyan    1;36
//   Red         0;31     Light Red     1;31
//   Purple      0;35     Light Purple  1;35
//   Brown       0;33     Yellow        1;33
//   Light Gray  0;37     White         1;37

pub const BLACK: &str = "\x1b[0;30m";
pub const GRAY: &str = "\x1b[1;30m";
pub const RED: &str = "\x1b[0;31m";
pub const LRED: &str = "\x1b[1;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const LGREEN: &str = "\x1b[1;32m";
pub const BROWN: &str = "\x1b[0;33m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const DBLUE: &str = "\x1b[0;34m";
pub const BLUE: &str = "\x1b[1;34m";
pub const PURPLE: &str = "\x1b[0;35m";
pub const LPURPLE: &str = "\x1b[1;35m";
pub const CYAN: &str = "\x1b[0;36m";
pub const LCYAN: &str = "\x1b[1;36m";
pub const LGRAY: &str = "\x1b[0;37m";
pub const WHITE: &str = "\x1b[1;37m";
/// 컬러 리셋
pub const NONE: &str = "\x1b[0m";

/// 플레이스홀더 이름 -> ANSI 코드 테이블
pub const COLOUR_TABLE: [(&str, &str); 17] = [
    ("BLACK", BLACK),
    ("GRAY", GRAY),
    ("RED", RED),
    ("LRED", LRED),
    ("GREEN", GREEN),
    ("LGREEN", LGREEN),
    ("BROWN", BROWN),
    ("YELLOW", YELLOW),
    ("DBLUE", DBLUE),
    ("BLUE", BLUE),
    ("PURPLE", PURPLE),
    ("LPURPLE", LPURPLE),
    ("CYAN", CYAN),
    ("LCYAN", LCYAN),
    ("LGRAY", LGRAY),
    ("WHITE", WHITE),
    ("NONE", NONE),
];

/// `${NAME}` 플레이스홀더를 ANSI 코드로 확장하고 끝에 리셋 코드를 붙입니다.
///
/// 테이블에 없는 플레이스홀더는 그대로 남습니다.
///
/// ```
/// use logsift_core::colour;
/// let s = colour::expand_colours("${GREEN}ok${NONE}");
/// assert!(s.starts_with(colour::GREEN));
/// assert!(s.ends_with(colour::NONE));
/// ```
pub fn expand_colours(template: &str) -> String {
    let mut result = expand_colours_no_reset(template);
    result.push_str(NONE);
    result
}

/// 리셋 코드를 덧붙이지 않는 확장.
pub fn expand_colours_no_reset(template: &str) -> String {
    let mut result = template.to_owned();
    for (name, code) in COLOUR_TABLE {
        if result.contains("${") {
            result = result.replace(&format!("${{{name}}}"), code);
        }
    }
    result
}

/// 문자열에서 이 테이블의 모든 ANSI 코드를 제거합니다.
pub fn remove_colours(string: &str) -> String {
    let mut result = string.to_owned();
    // NONE(0m) 계열이 다른 코드의 접두가 아니므로 단순 치환으로 충분합니다
    for (_, code) in COLOUR_TABLE {
        result = result.replace(code, "");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_substitutes_known_names() {
        let s = expand_colours("${GREEN}Hello ${YELLOW}Joe${NONE}");
        assert!(s.contains(GREEN));
        assert!(s.contains(YELLOW));
        assert!(!s.contains("${"));
    }

    #[test]
    fn expand_appends_reset() {
        let s = expand_colours("plain text");
        assert_eq!(s, format!("plain text{NONE}"));
    }

    #[test]
    fn expand_leaves_unknown_placeholders() {
        let s = expand_colours_no_reset("${NOPE}text");
        assert_eq!(s, "${NOPE}text");
    }

    #[test]
    fn remove_strips_all_codes() {
        let coloured = expand_colours("${RED}failed${NONE}");
        assert_eq!(remove_colours(&coloured), "failed");
    }

    #[test]
    fn remove_on_plain_text_is_identity() {
        assert_eq!(remove_colours("no colours here"), "no colours here");
    }
}
