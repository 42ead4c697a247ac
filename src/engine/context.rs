// Winks Companion Engine — Context Injection
//
// Pure helpers that decide whether an outgoing message looks like a question
// and, if so, wrap it with persona, route, and live quest context before
// dispatch. No I/O here; everything below is deterministic string assembly,
// so the dispatcher can run it exactly once per send and resend the same
// payload on every retry.

use crate::atoms::types::QuestSnapshot;

// ── Question heuristic ─────────────────────────────────────────────────────

/// Tokens that mark a message as question-like even without a '?'.
/// Matched as case-insensitive substrings.
const QUESTION_TOKENS: [&str; 7] = ["how", "what", "where", "when", "why", "can", "help"];

/// Heuristic: does this message want an informative answer?
pub fn is_question_like(message: &str) -> bool {
    if message.contains('?') {
        return true;
    }
    let lowered = message.to_lowercase();
    QUESTION_TOKENS.iter().any(|token| lowered.contains(token))
}

// ── Static context blocks ──────────────────────────────────────────────────

/// Fixed persona block injected ahead of every question-like message.
const PERSONA_CONTEXT: &str = "About Winks: Winks is the quest companion for the Winks platform, \
a Web3 quest hub on BNB Chain. Winks keeps a playful, encouraging tone, answers briefly, and \
knows about BNB Chain basics, wallets, quest rules, quiz scoring, riddles, creative challenges, \
badges, and referral tiers.";

const QUIZ_ROUTE_CONTEXT: &str = "The user is currently on the quiz page, answering timed \
multiple-choice questions about BNB Chain and Web3 to earn quest points.";

const RIDDLE_ROUTE_CONTEXT: &str = "The user is currently on the riddles page, working through \
the daily Web3 riddle for bonus rewards.";

const CREATIVE_ROUTE_CONTEXT: &str = "The user is currently on the creative challenge page, \
where they submit original content for community quests.";

const QUESTS_ROUTE_CONTEXT: &str = "The user is browsing the quests hub, which lists the \
available quizzes, riddles, and creative challenges.";

const HOME_ROUTE_CONTEXT: &str = "The user is on the home dashboard, which shows their points, \
badges, and referral progress.";

/// Route-specific context sentence, selected by path prefix.
/// Unknown routes contribute nothing.
fn route_context(route: &str) -> &'static str {
    if route.starts_with("/quests/quiz") {
        QUIZ_ROUTE_CONTEXT
    } else if route.starts_with("/quests/riddles") {
        RIDDLE_ROUTE_CONTEXT
    } else if route.starts_with("/quests/creative") {
        CREATIVE_ROUTE_CONTEXT
    } else if route.starts_with("/quests") {
        QUESTS_ROUTE_CONTEXT
    } else if route == "/" {
        HOME_ROUTE_CONTEXT
    } else {
        ""
    }
}

// ── Snapshot rendering ─────────────────────────────────────────────────────

/// Serialize whichever puzzle state is present into plain context lines.
fn render_snapshot(snapshot: &QuestSnapshot) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(quiz) = &snapshot.quiz {
        let mut line = format!("Active quiz ({}): {}", quiz.topic, quiz.question);
        if !quiz.options.is_empty() {
            line.push_str(&format!(" Options: {}.", quiz.options.join(", ")));
        }
        lines.push(line);
    }
    if let Some(riddle) = &snapshot.riddle {
        lines.push(format!(
            "Active riddle: {} (hints used: {})",
            riddle.prompt, riddle.hints_used
        ));
    }
    if let Some(creative) = &snapshot.creative {
        let status = if creative.submitted {
            "already submitted"
        } else {
            "not yet submitted"
        };
        lines.push(format!(
            "Active creative challenge: {} ({})",
            creative.prompt, status
        ));
    }
    if !snapshot.recent_facts.is_empty() {
        lines.push(format!(
            "Facts recently shown to the user: {}",
            snapshot.recent_facts.join("; ")
        ));
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("Current activity:\n{}", lines.join("\n"))
    }
}

// ── Message assembly ───────────────────────────────────────────────────────

/// Build the outgoing message content.
///
/// Question-like messages get the full context block — persona, route
/// sentence, quest snapshot — followed by the literal `User question: `
/// prefix and the original text. Everything else passes through unmodified.
///
/// Returns `(content, enhanced)`. Deterministic: identical inputs yield
/// byte-identical output.
pub fn build_enhanced_message(
    message: &str,
    route: &str,
    snapshot: Option<&QuestSnapshot>,
) -> (String, bool) {
    if !is_question_like(message) {
        return (message.to_string(), false);
    }

    let mut sections = vec![PERSONA_CONTEXT.to_string()];

    let route_ctx = route_context(route);
    if !route_ctx.is_empty() {
        sections.push(route_ctx.to_string());
    }

    if let Some(snapshot) = snapshot {
        let rendered = render_snapshot(snapshot);
        if !rendered.is_empty() {
            sections.push(rendered);
        }
    }

    sections.push(format!("User question: {message}"));
    (sections.join("\n\n"), true)
}

// ── Tests ──────────────────────────────────────────────────────────────────
