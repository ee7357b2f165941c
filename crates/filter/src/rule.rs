//! 규칙 타입 -- 매칭/변환의 최소 단위
//!
//! [`Rule`]은 닫힌 enum으로 세 가지 종류를 표현합니다.
//! - `Action`: 정규식 + 핸들러. 핸들러가 치환 라인(들) 또는 억제를 결정합니다.
//! - `Template`: 정규식 + 치환 템플릿 (`${1}` 캡처 참조). 템플릿이 없으면 억제.
//! - `Literal`: 정확한 부분 문자열 + 치환 텍스트. 라인 내 모든 출현을 치환.
//!
//! 패턴은 라인 시작에 앵커링되며, `None` 패턴은 catch-all(`^.*$`)을
//! 의미합니다. catch-all은 관례상 목록의 마지막에 두어야 합니다 (엔진은
//! 이 순서를 강제하지 않습니다 -- 잘못 배치하면 호출자 버그입니다).

use regex::{Captures, Regex};

use crate::error::FilterError;

/// 핸들러가 한 라인에 대해 내린 결정
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutput {
    /// 라인을 출력하지 않음
    Suppress,
    /// 단일 치환 라인
    Line(String),
    /// 여러 치환 라인
    Lines(Vec<String>),
}

/// Action 규칙의 핸들러 시그니처
///
/// 라인 전체, 캡처 그룹, 스트림별 컨텍스트(`C`)를 명시적으로 받습니다.
/// 규칙 객체에 숨겨진 매칭 상태는 없습니다.
pub type Handler<C> =
    Box<dyn Fn(&str, &Captures<'_>, &mut C) -> Result<HandlerOutput, FilterError> + Send>;

/// 하나의 매칭/변환 규칙
///
/// `C`는 스트림별 컨텍스트 타입입니다 (빌드 세션 상태, 레벨 규칙 테이블,
/// 상태가 없으면 `()`).
pub enum Rule<C> {
    /// 정규식 + 핸들러
    Action {
        /// 앵커링된 매칭 패턴
        pattern: Regex,
        /// 매칭 시 호출되는 핸들러
        handler: Handler<C>,
    },
    /// 정규식 + 치환 템플릿
    Template {
        /// 앵커링된 매칭 패턴
        pattern: Regex,
        /// 치환 템플릿. `None` 또는 빈 문자열이면 억제.
        template: Option<String>,
    },
    /// 부분 문자열 치환
    Literal {
        /// 찾을 부분 문자열
        needle: String,
        /// 치환 텍스트 (기본: 빈 문자열, 즉 삭제)
        replacement: String,
    },
}

impl<C> Rule<C> {
    /// Action 규칙을 생성합니다. `pattern`이 `None`이면 catch-all.
    pub fn action<F>(pattern: Option<&str>, handler: F) -> Result<Self, FilterError>
    where
        F: Fn(&str, &Captures<'_>, &mut C) -> Result<HandlerOutput, FilterError> + Send + 'static,
    {
        Ok(Rule::Action {
            pattern: compile_anchored(pattern)?,
            handler: Box::new(handler),
        })
    }

    /// Template 규칙을 생성합니다. `template`이 `None`이면 억제를 의미합니다.
    pub fn template(pattern: Option<&str>, template: Option<&str>) -> Result<Self, FilterError> {
        Ok(Rule::Template {
            pattern: compile_anchored(pattern)?,
            template: template.map(str::to_owned),
        })
    }

    /// Literal 규칙을 생성합니다. `replacement`가 `None`이면 삭제를 의미합니다.
    pub fn literal(needle: &str, replacement: Option<&str>) -> Self {
        Rule::Literal {
            needle: needle.to_owned(),
            replacement: replacement.unwrap_or_default().to_owned(),
        }
    }
}

impl<C> std::fmt::Debug for Rule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Action { pattern, .. } => f
                .debug_struct("Action")
                .field("pattern", &pattern.as_str())
                .finish_non_exhaustive(),
            Rule::Template { pattern, template } => f
                .debug_struct("Template")
                .field("pattern", &pattern.as_str())
                .field("template", template)
                .finish(),
            Rule::Literal {
                needle,
                replacement,
            } => f
                .debug_struct("Literal")
                .field("needle", needle)
                .field("replacement", replacement)
                .finish(),
        }
    }
}

/// 패턴을 라인 시작에 앵커링하여 컴파일합니다.
///
/// `None`은 catch-all(`^.*$`)로 컴파일됩니다. 컴파일 실패는
/// 규칙 생성 시점의 구성 에러로 즉시 반환됩니다.
pub(crate) fn compile_anchored(pattern: Option<&str>) -> Result<Regex, FilterError> {
    let raw = match pattern {
        None => "^.*$".to_owned(),
        Some(p) if p.starts_with('^') => p.to_owned(),
        Some(p) => format!("^(?:{p})"),
    };

    Regex::new(&raw).map_err(|source| FilterError::Pattern {
        pattern: raw.clone(),
        source,
    })
}

/// 규칙 집합 -- 두 개의 순서 있는 규칙 시퀀스
///
/// - terminal 규칙: 먼저 평가되며, 첫 매칭이 그 라인의 처리를 끝냅니다.
/// - chained 규칙: 순서대로 평가되며, 각 규칙이 이전 출력에 대해
///   추가 변환을 수행할 수 있습니다.
///
/// 두 시퀀스는 인스턴스별로 독립적으로 소유됩니다 (공유 기본값 없음).
pub struct RuleSet<C> {
    terminal: Vec<Rule<C>>,
    chained: Vec<Rule<C>>,
}

impl<C> RuleSet<C> {
    /// 빈 규칙 집합을 생성합니다.
    pub fn new() -> Self {
        Self {
            terminal: Vec::new(),
            chained: Vec::new(),
        }
    }

    /// terminal Action 규칙을 추가합니다.
    pub fn add_terminal_action<F>(
        &mut self,
        pattern: Option<&str>,
        handler: F,
    ) -> Result<(), FilterError>
    where
        F: Fn(&str, &Captures<'_>, &mut C) -> Result<HandlerOutput, FilterError> + Send + 'static,
    {
        self.terminal.push(Rule::action(pattern, handler)?);
        Ok(())
    }

    /// terminal Template 규칙을 추가합니다.
    pub fn add_terminal_template(
        &mut self,
        pattern: Option<&str>,
        template: Option<&str>,
    ) -> Result<(), FilterError> {
        self.terminal.push(Rule::template(pattern, template)?);
        Ok(())
    }

    /// terminal Literal 규칙을 추가합니다.
    pub fn add_terminal_literal(&mut self, needle: &str, replacement: Option<&str>) {
        self.terminal.push(Rule::literal(needle, replacement));
    }

    /// chained Action 규칙을 추가합니다.
    pub fn add_chained_action<F>(
        &mut self,
        pattern: Option<&str>,
        handler: F,
    ) -> Result<(), FilterError>
    where
        F: Fn(&str, &Captures<'_>, &mut C) -> Result<HandlerOutput, FilterError> + Send + 'static,
    {
        self.chained.push(Rule::action(pattern, handler)?);
        Ok(())
    }

    /// chained Template 규칙을 추가합니다.
    pub fn add_chained_template(
        &mut self,
        pattern: Option<&str>,
        template: Option<&str>,
    ) -> Result<(), FilterError> {
        self.chained.push(Rule::template(pattern, template)?);
        Ok(())
    }

    /// chained Literal 규칙을 추가합니다.
    pub fn add_chained_literal(&mut self, needle: &str, replacement: Option<&str>) {
        self.chained.push(Rule::literal(needle, replacement));
    }

    /// terminal 규칙 목록
    pub fn terminal(&self) -> &[Rule<C>] {
        &self.terminal
    }

    /// chained 규칙 목록
    pub fn chained(&self) -> &[Rule<C>] {
        &self.chained
    }
}

impl<C> Default for RuleSet<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// 항상 억제하는 핸들러 (원본의 print_nothing에 대응)
pub fn suppress<C>(
    _line: &str,
    _caps: &Captures<'_>,
    _ctx: &mut C,
) -> Result<HandlerOutput, FilterError> {
    Ok(HandlerOutput::Suppress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_fails_at_construction() {
        let result = Rule::<()>::template(Some("(unclosed"), None);
        assert!(matches!(result, Err(FilterError::Pattern { .. })));
    }

    #[test]
    fn none_pattern_is_catch_all() {
        let rule = Rule::<()>::template(None, Some("x")).unwrap();
        let Rule::Template { pattern, .. } = rule else {
            panic!("expected template rule");
        };
        assert!(pattern.is_match("anything at all"));
        assert!(pattern.is_match(""));
    }

    #[test]
    fn unanchored_pattern_gets_anchored() {
        let rule = Rule::<()>::template(Some(r"Tests run: (\d+)"), None).unwrap();
        let Rule::Template { pattern, .. } = rule else {
            panic!("expected template rule");
        };
        assert!(pattern.is_match("Tests run: 3"));
        // 라인 중간 출현에는 매칭되지 않아야 합니다
        assert!(!pattern.is_match("prefix Tests run: 3"));
    }

    #[test]
    fn rule_sets_own_independent_lists() {
        let mut a = RuleSet::<()>::new();
        let b = RuleSet::<()>::new();
        a.add_terminal_literal("x", None);
        assert_eq!(a.terminal().len(), 1);
        assert_eq!(b.terminal().len(), 0);
    }

    #[test]
    fn literal_defaults_to_deletion() {
        let rule = Rule::<()>::literal("[INFO] ", None);
        let Rule::Literal { replacement, .. } = rule else {
            panic!("expected literal rule");
        };
        assert_eq!(replacement, "");
    }
}
