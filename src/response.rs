//! response.rs — Voice-verb markup renderer (boundary adapter).
//!
//! Turns a `Verdict` or a resolved destination into the XML verb document the
//! telephony carrier executes. This is deliberately the only module that
//! knows the markup exists; the decision core returns data, never markup.
//! Five fixed verbs cover the whole surface, so the document is assembled by
//! hand rather than through an XML dependency.

use crate::config::ScreeningPrompt;
use crate::verdict::{CallAction, Verdict};

/// Where the digit-capture verb posts its result.
pub const SCREEN_ACTION_PATH: &str = "/voice/screen";

const SAY_VOICE: &str = "woman";
const SAY_LANGUAGE: &str = "en-US";

const BLOCKED_NOTICE: &str =
    "This number has been blocked. If you believe this is an error, please email support.";
const VOICEMAIL_PROMPT: &str = "Please leave a message.";

#[derive(Debug, Clone, PartialEq)]
enum Verb {
    Say(String),
    Pause(u32),
    Hangup,
    Redirect(String),
    Gather {
        num_digits: u32,
        timeout_secs: u32,
        prompt: String,
    },
}

/// Ordered verb sequence for one call leg.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn pause(mut self, length_secs: u32) -> Self {
        self.verbs.push(Verb::Pause(length_secs));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// Hand the call to another webhook (the "dial elsewhere" primitive).
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    /// Interactive digit capture; the carrier enforces the timeout.
    pub fn gather(mut self, screening: &ScreeningPrompt) -> Self {
        self.verbs.push(Verb::Gather {
            num_digits: screening.num_digits,
            timeout_secs: screening.timeout_secs,
            prompt: screening.prompt.clone(),
        });
        self
    }

    /// Map a verdict (plus the already-resolved destination for clean calls)
    /// to its verb sequence.
    pub fn for_verdict(verdict: &Verdict, screening: &ScreeningPrompt, destination: &str) -> Self {
        match verdict.action {
            CallAction::Forward => Self::new().redirect(destination),
            CallAction::Screen => {
                // No digit within the timeout falls through the Gather to Hangup.
                Self::new().gather(screening).hangup()
            }
            CallAction::Hangup => Self::new().hangup(),
            CallAction::Voicemail => Self::new().say(VOICEMAIL_PROMPT).hangup(),
            CallAction::BlockedMessage => Self::new().say(BLOCKED_NOTICE).pause(1).hangup(),
        }
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => {
                    out.push_str(&format!(
                        r#"<Say voice="{SAY_VOICE}" language="{SAY_LANGUAGE}">{}</Say>"#,
                        escape_xml(text)
                    ));
                }
                Verb::Pause(len) => out.push_str(&format!(r#"<Pause length="{len}"/>"#)),
                Verb::Hangup => out.push_str("<Hangup/>"),
                Verb::Redirect(url) => {
                    out.push_str(&format!(
                        r#"<Redirect method="POST">{}</Redirect>"#,
                        escape_xml(url)
                    ));
                }
                Verb::Gather {
                    num_digits,
                    timeout_secs,
                    prompt,
                } => {
                    out.push_str(&format!(
                        r#"<Gather action="{SCREEN_ACTION_PATH}" method="POST" numDigits="{num_digits}" timeout="{timeout_secs}">"#
                    ));
                    out.push_str(&format!(
                        r#"<Say voice="{SAY_VOICE}" language="{SAY_LANGUAGE}">{}</Say>"#,
                        escape_xml(prompt)
                    ));
                    out.push_str("</Gather>");
                }
            }
        }
        out.push_str("</Response>");
        out
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
