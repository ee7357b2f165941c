//! 빌드 출력 상태 머신 -- Maven 출력 필터
//!
//! 멀티 모듈 빌드 도구의 텍스트 출력을 추적하면서 장황한 보일러플레이트를
//! 접습니다. 인식된 진행 라인이 세션 상태(현재 플러그인/모듈/테스트,
//! 실패 모듈 목록)를 갱신하며, 상태는 이 필터 인스턴스가 단독으로
//! 소유합니다. 수명은 펌프 한 번의 실행이고, "reset status" 마커만이
//! 일시 상태를 초기화합니다.
//!
//! fast-quit 마커와 같은 치명적 트리거는 억제가 아니라 에러로 전파되어
//! 펌프 전체를 중단시킵니다. 업스트림 빌드가 그 라인 이후 복구 불가능하게
//! 죽어 있기 때문입니다.

use logsift_core::colour::expand_colours;

use crate::engine::RuleFilter;
use crate::error::FilterError;
use crate::rule::{HandlerOutput, RuleSet};

/// 빌드 세션 상태
///
/// 이 필터의 인식된 진행 라인만이 상태를 변경하며, 다른 어떤 컴포넌트도
/// 읽거나 쓰지 않습니다. 스트림 간 공유는 금지입니다 (스트림마다
/// 필터 인스턴스를 새로 만드세요).
#[derive(Debug, Default)]
pub struct BuildSession {
    /// 현재 실행 중인 플러그인 이름
    pub current_plugin: Option<String>,
    /// 현재 모듈 인덱스
    pub current_module: u32,
    /// 현재 실행 중인 테스트 이름
    pub current_test: Option<String>,
    /// 지금까지 실패한 모듈 이름 (등록 순서 유지)
    pub failed_modules: Vec<String>,
}

impl BuildSession {
    /// "reset status" 마커: 일시적 모듈 추적을 지웁니다.
    ///
    /// `failed_modules`는 세션 전체의 누적 기록이므로 지우지 않습니다.
    fn reset_transient(&mut self) {
        self.current_plugin = None;
        self.current_module = 0;
        self.current_test = None;
    }
}

/// 모듈 요약 상태 키워드 (success / skipped / failure)
///
/// 네 번째 키워드가 등장하면 이 규칙의 패턴에 매칭되지 않아 catch-all로
/// 떨어집니다. 에러가 아니라 의도된 관용입니다 (새 키워드 허용).
const SUMMARY_PATTERN: &str = r"^\[INFO\] (.+) \.+ (SUCCESS|SKIPPED|FAILURE)( \[\d+\.\d+s\])?$";

/// Maven 빌드 출력 필터를 생성합니다.
///
/// 모든 규칙은 terminal입니다: 라인 하나에 규칙 하나만 실행됩니다.
/// 마지막 catch-all이 어떤 입력 라인도 조용히 사라지지 않도록 보장합니다.
pub fn build_output_filter() -> Result<RuleFilter<BuildSession>, FilterError> {
    let mut set = RuleSet::<BuildSession>::new();

    // 플러그인 goal 진입/진출 마커: 상태 갱신 후 억제
    set.add_terminal_action(
        Some(r"^\[INFO\] (>>>|<<<|---) ([\w\-\.\d:]+) \((.+)\) @ ([\w\-\.\d:]+) (>>>|<<<|---)$"),
        |_, caps, session: &mut BuildSession| {
            session.current_plugin = Some(caps[2].to_owned());
            Ok(HandlerOutput::Suppress)
        },
    )?;
    // reset status 마커: 일시 상태만 초기화하고 억제.
    // 아래 단일 토큰 템플릿의 문자 클래스에 '-'가 포함되어 있고,
    // surefire 대시 라인(55개)도 이 마커(72개)의 부분 문자열이므로
    // 두 규칙보다 반드시 먼저 평가되어야 합니다.
    set.add_terminal_action(Some(r"^\[INFO\] -{72}$"), |_, _, session: &mut BuildSession| {
        session.reset_transient();
        Ok(HandlerOutput::Suppress)
    })?;

    set.add_terminal_template(Some(r"^\[INFO\] ([\w\.\-]+)$"), None)?;
    set.add_terminal_literal("[INFO] Scanning for projects...", None);
    set.add_terminal_literal("[INFO] Reactor Build Order:", None);
    set.add_terminal_template(Some(r"^\[INFO\] (.+) already added, skipping$"), None)?;
    set.add_terminal_template(
        Some(r"^\[INFO\] Using 'UTF-8' encoding to copy filtered resources\.$"),
        None,
    )?;
    set.add_terminal_template(Some(r"^\[INFO\] Copying (\d+) resource(?:s)?$"), None)?;
    set.add_terminal_template(Some(r"^Downloading: (.+)$"), None)?;
    set.add_terminal_template(
        Some(r"^Downloaded: (.+) \(([\d\.]+ \w+) at ([\d\.]+ [\w/]+)\)$"),
        None,
    )?;

    set.add_terminal_template(
        Some(r"^\[INFO\] Building ([\w\.\-]+) (.+)$"),
        Some(&expand_colours("${GRAY}Building${GREEN} ${1}${BROWN} ${2}${NONE}")),
    )?;
    set.add_terminal_template(Some(r"^\[INFO\] Building (jar|war): (.+)$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Deleting (.+)$"), None)?;

    set.add_terminal_template(
        Some(r"^\[INFO\] BUILD SUCCESS$"),
        Some(&expand_colours("${GREEN}*** BUILD SUCCESS ***")),
    )?;
    set.add_terminal_template(
        Some(r"^\[INFO\] BUILD FAILURE$"),
        Some(&expand_colours("${RED} *** BUILD FAILURE ***")),
    )?;

    // 병렬 빌드 @threadSafe 경고 박스
    set.add_terminal_literal(
        "[WARNING] *****************************************************************",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * Your build is requesting parallel execution, but project      *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * contains the following plugin(s) that are not marked as       *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * @threadSafe to support parallel building.                     *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * While this /may/ work fine, please look for plugin updates    *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * and/or request plugins be made thread-safe.                   *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * If reporting an issue, report it against the plugin in        *",
        None,
    );
    set.add_terminal_literal(
        "[WARNING] * question, not against maven-core                              *",
        None,
    );
    set.add_terminal_template(
        Some(r"\[WARNING\] The following plugins are not marked @threadSafe in (.+):"),
        None,
    )?;

    set.add_terminal_template(
        Some(r"\[WARNING\] Cannot include project artifact: (.+); it doesn't have an associated file or directory\."),
        None,
    )?;
    set.add_terminal_template(
        Some(r"\[WARNING\] Assembly file: (.+) is not a regular file \(it may be a directory\)\. It cannot be attached to the project build for installation or deployment\."),
        None,
    )?;

    // 테스트/컴파일 단계 소음
    set.add_terminal_literal("[INFO] No tests to run.", None);
    set.add_terminal_literal("[INFO] Not compiling test sources", None);
    set.add_terminal_literal("[INFO] Tests are skipped.", None);
    set.add_terminal_literal("[INFO] No sources to compile.", None);
    set.add_terminal_template(
        Some(r"^\[INFO\] Compiling (\d+) source file(?:s)? to (.+)\.$"),
        Some(&expand_colours("${GRAY}Compiling: ${GREEN}Compiling${BROWN} ${1}${GREEN} source files")),
    )?;
    set.add_terminal_template(Some(r"^\[INFO\] skip non existing resourceDirectory .*$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Reading assembly descriptor: .*$"), None)?;
    set.add_terminal_literal("[INFO] Nothing to compile - all classes are up to date", None);
    set.add_terminal_literal("[INFO] No sources to compile", None);

    // 모듈별 요약 라인: FAILURE만 강조 출력, 나머지 상태 키워드는 억제
    set.add_terminal_action(Some(SUMMARY_PATTERN), |_, caps, session: &mut BuildSession| {
        let module_name = &caps[1];
        let status = &caps[2];

        if status == "FAILURE" {
            session.failed_modules.push(module_name.to_owned());
            return Ok(HandlerOutput::Line(expand_colours(&format!(
                "${{RED}}Failed module: ${{YELLOW}}{module_name}"
            ))));
        }
        Ok(HandlerOutput::Suppress)
    })?;

    set.add_terminal_template(Some(r"^\[INFO\] Installing (.+) to (.+)$"), None)?;

    // 패키징 단계 소음 (war/ear/jar)
    set.add_terminal_literal("[INFO] Packaging war-overlay", None);
    set.add_terminal_template(Some(r"^\[INFO\] Processing overlay \[ id (.+)\]$"), None)?;
    set.add_terminal_literal("[INFO] Packaging classes", None);
    set.add_terminal_literal("[INFO] Processing war project", None);
    set.add_terminal_literal("[INFO] No sources in project. Archive not created.", None);
    set.add_terminal_template(
        Some(r"^\[INFO\] Copying webapp webResources \[(.+)\] to \[(.+)\]$"),
        None,
    )?;
    set.add_terminal_template(Some(r"^\[INFO\] Copying (\d+) resource$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Copy ear sources (.+)$"), None)?;
    set.add_terminal_template(
        Some(r"^\[INFO\] Could not find manifest file: (.+) - Generating one$"),
        None,
    )?;
    set.add_terminal_literal(
        "[WARNING] Warning: selected war files include a WEB-INF/web.xml which will be ignored",
        None,
    );
    set.add_terminal_template(Some(r"Building jar: (.+)"), None)?;
    set.add_terminal_literal("[WARNING] JAR will be empty - no content was marked for inclusion!", None);
    set.add_terminal_literal(
        "(webxml attribute is missing from war task, or ignoreWebxml attribute is specified as 'true')",
        None,
    );
    set.add_terminal_literal("[INFO] Generating application.xml", None);

    set.add_terminal_literal("[INFO] Packaging webapp", None);
    set.add_terminal_template(Some(r"^\[INFO\] Assembling webapp \[(.+)\] in \[(.+)\]$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Copying webapp resources \[(.+)\]$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Copying artifact\[(.+)\] to\[(.+)\]$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Copying files to (.+)$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Webapp assembled in \[(.+)\]$"), None)?;

    // surefire 테스트 러너 소음
    set.add_terminal_literal("-------------------------------------------------------", None);
    set.add_terminal_literal(" T E S T S", None);
    set.add_terminal_literal("Results :", None);
    set.add_terminal_literal("There are no tests to run.", None);
    set.add_terminal_template(Some(r"\[INFO\] Surefire report directory: (.+)$"), None)?;

    // 실행 중인 테스트 이름은 세션에 기록하고 억제합니다
    set.add_terminal_action(
        Some(r"Running (?:.+\.)?(.*Test.*)"),
        |_, caps, session: &mut BuildSession| {
            session.current_test = Some(caps[1].to_owned());
            Ok(HandlerOutput::Suppress)
        },
    )?;
    set.add_terminal_template(
        Some(r"Tests run: (\d+), Failures: (\d+), Errors: (\d+), Skipped: (\d+), Time elapsed: ([\d\.]+ sec)"),
        None,
    )?;
    set.add_terminal_template(
        Some(r"Tests run: (\d+), Failures: (\d+), Errors: (\d+), Skipped: (\d+)"),
        None,
    )?;

    // fast-quit 마커: 빌드가 복구 불가능하게 죽음 -- 펌프를 중단시킵니다
    set.add_terminal_action(
        Some(r"^mvnw: OSError: .* failed with exit code: (\d+)$"),
        |line, _, _| {
            Err(FilterError::BuildAborted {
                line: line.to_owned(),
            })
        },
    )?;
    set.add_terminal_literal("[INFO] Reactor Summary:", None);
    set.add_terminal_template(Some(r"^Destroying (\d+) processes$"), None)?;
    set.add_terminal_literal("Destroying process...", None);
    set.add_terminal_template(Some(r"^Destroyed (\d+) processes$"), None)?;

    set.add_terminal_template(Some(r"^\[INFO\] Total time: (.+) \(Wall Clock\)$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Finished at: (.+)$"), None)?;
    set.add_terminal_template(Some(r"^\[INFO\] Final Memory: (\d+M)/(\d+M)$"), None)?;

    set.add_terminal_template(
        Some(r"^\[WARNING\] (.*)$"),
        Some(&expand_colours("${BROWN}WARNING ${1}")),
    )?;
    set.add_terminal_template(
        Some(r"^\[ERROR\] (.*)$"),
        Some(&expand_colours("${RED}ERROR ${1}")),
    )?;

    // 빈 태그 라인과 공백 라인
    set.add_terminal_template(Some(r"^\[\w+\]\s*$"), None)?;
    set.add_terminal_template(Some(r"^\s*$"), None)?;

    // catch-all: 어떤 라인도 진단 흔적 없이 사라지지 않습니다
    set.add_terminal_action(None, |line, _, _| {
        Ok(HandlerOutput::Line(expand_colours(&format!(
            "${{GRAY}}(unmatched) ${{NONE}}\"{line}\""
        ))))
    })?;

    tracing::debug!(
        terminal_rules = set.terminal().len(),
        "maven build output filter constructed"
    );
    Ok(RuleFilter::new(set, BuildSession::default()))
}
