use chrono::{ DateTime, NaiveDateTime, TimeZone, Utc };
use chrono_tz::Tz;

use crate::db::{ LinkButton, NewSchedule };
use crate::enums::{ Interval, MediaKind, ScheduleKind };
use crate::error::{ AppError, Result };

/// Reply-keyboard tokens the dialogue understands.
pub const YES_TOKEN: &str = "Yes";
pub const NO_TOKEN: &str = "No";
pub const CONFIRM_TOKEN: &str = "✅ Confirm";
pub const CANCEL_TOKEN: &str = "❌ Cancel";

/// Civil date-time pattern operators type, interpreted in the configured timezone.
pub const TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Which prompt the dialogue is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStep {
    AwaitingTarget,
    AwaitingMedia,
    AwaitingText,
    AwaitingButtonDecision,
    AwaitingButtonLabel,
    AwaitingButtonUrl,
    AwaitingPinDecision,
    AwaitingFireTime,
    AwaitingInterval,
    AwaitingRepetitions,
    AwaitingStartTime,
    AwaitingConfirmation,
}

/// Partially populated schedule specification, one per in-flight dialogue.
#[derive(Debug, Clone)]
pub struct Draft {
    pub kind: ScheduleKind,
    pub target: Option<String>,
    pub media: Option<(MediaKind, String)>,
    pub text: Option<String>,
    pub buttons: Vec<LinkButton>,
    pending_button_label: Option<String>,
    pub pin_after_send: Option<bool>,
    pub fire_at: Option<DateTime<Utc>>,
    pub start_at: Option<DateTime<Utc>>,
    pub interval: Option<Interval>,
    pub repetitions: Option<u32>,
}

impl Draft {
    fn new(kind: ScheduleKind) -> Self {
        Self {
            kind,
            target: None,
            media: None,
            text: None,
            buttons: Vec::new(),
            pending_button_label: None,
            pin_after_send: None,
            fire_at: None,
            start_at: None,
            interval: None,
            repetitions: None,
        }
    }

    /// Human-readable summary shown before confirmation.
    pub fn summary(&self, tz: Tz) -> String {
        let mut summary = String::from("📋 *Schedule Summary*\n\n");
        summary.push_str(&format!("▪️ Type: {}\n", self.kind.display_name()));

        if let Some(target) = &self.target {
            summary.push_str(&format!("▪️ Target: {}\n", target));
        }
        if let Some((kind, _)) = &self.media {
            summary.push_str(&format!("▪️ Media: {}\n", kind.display_name()));
        }
        summary.push_str(&format!(
            "▪️ Pin: {}\n",
            if self.pin_after_send.unwrap_or(false) { "Yes" } else { "No" }
        ));
        if !self.buttons.is_empty() {
            summary.push_str(&format!("▪️ Buttons: {}\n", self.buttons.len()));
        }

        match self.kind {
            ScheduleKind::OneShot => {
                if let Some(at) = self.fire_at {
                    summary.push_str(&format!(
                        "\n🗓 Scheduled for: {}",
                        at.with_timezone(&tz).format(TIME_FORMAT)
                    ));
                }
            }
            ScheduleKind::Recurring => {
                if let Some(at) = self.start_at {
                    summary.push_str(&format!(
                        "\n▶️ Starts at: {}\n",
                        at.with_timezone(&tz).format(TIME_FORMAT)
                    ));
                }
                if let Some(every) = &self.interval {
                    summary.push_str(&format!("⏳ Interval: every {}\n", every));
                }
                match self.repetitions {
                    Some(0) => summary.push_str("🔁 Repetitions: unlimited"),
                    Some(n) => summary.push_str(&format!("🔁 Repetitions: {}", n)),
                    None => {}
                }
            }
        }

        summary
    }

    /// Turn a confirmed draft into a persistable specification.
    pub fn finish(self, owner_id: i64) -> Result<NewSchedule> {
        let target = self.target
            .ok_or_else(|| AppError::Internal("draft has no target".to_string()))?;
        let text = self.text.ok_or_else(|| AppError::Internal("draft has no text".to_string()))?;
        let pin_after_send = self.pin_after_send.unwrap_or(false);

        let (fire_at, start_at, interval, repetitions_remaining) = match self.kind {
            ScheduleKind::OneShot => {
                let fire_at = self.fire_at
                    .ok_or_else(|| AppError::Internal("draft has no fire time".to_string()))?;
                (Some(fire_at), None, None, None)
            }
            ScheduleKind::Recurring => {
                let start_at = self.start_at
                    .ok_or_else(|| AppError::Internal("draft has no start time".to_string()))?;
                let interval = self.interval
                    .ok_or_else(|| AppError::Internal("draft has no interval".to_string()))?;
                let repetitions = self.repetitions
                    .ok_or_else(|| AppError::Internal("draft has no repetitions".to_string()))?;
                (None, Some(start_at), Some(interval), Some(repetitions as i32))
            }
        };

        Ok(NewSchedule {
            kind: self.kind,
            owner_id,
            target,
            text,
            media: self.media,
            buttons: self.buttons,
            pin_after_send,
            fire_at,
            start_at,
            interval,
            repetitions_remaining,
        })
    }
}

/// One in-flight dialogue: current step plus the accumulating draft.
#[derive(Debug, Clone)]
pub struct DraftFlow {
    pub step: DraftStep,
    pub draft: Draft,
}

impl DraftFlow {
    pub fn new(kind: ScheduleKind) -> Self {
        Self {
            step: DraftStep::AwaitingTarget,
            draft: Draft::new(kind),
        }
    }
}

/// A single inbound event consumed by the dialogue.
#[derive(Debug, Clone)]
pub enum DraftEvent {
    Text(String),
    Media {
        kind: MediaKind,
        reference: String,
    },
    SkipMedia,
}

/// What the bot layer should say next; rendering is the bot layer's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    AskTarget,
    AskMedia,
    AskText,
    AskButtonDecision,
    AskButtonLabel,
    AskButtonUrl,
    AskPinDecision,
    AskFireTime,
    AskInterval,
    AskRepetitions,
    AskStartTime,
    AskConfirmation,
    InvalidTime,
    InvalidInterval,
    InvalidRepetitions,
    ExpectedYesNo,
    ExpectedConfirmation,
}

/// Result of feeding one event into the dialogue.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Stay in the dialogue; reply and wait for the next event.
    Continue {
        flow: DraftFlow,
        reply: Reply,
    },
    /// Operator confirmed; the draft is complete.
    Committed(Draft),
    /// Operator cancelled at the confirmation step.
    Cancelled,
}

fn is_yes(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(YES_TOKEN)
}

fn is_no(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case(NO_TOKEN)
}

/// Parse `DD/MM/YYYY HH:MM` as civil time in `tz`.
pub fn parse_civil_time(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_|
        AppError::InvalidInput(format!("Invalid date/time: {}", input))
    )?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidInput(format!("Nonexistent local time: {}", input)))
}

fn continue_with(step: DraftStep, draft: Draft, reply: Reply) -> Outcome {
    Outcome::Continue {
        flow: DraftFlow { step, draft },
        reply,
    }
}

/// Advance the dialogue by one event.
///
/// Shape mismatches re-issue the current prompt and leave both the step and
/// the draft untouched.
pub fn advance(flow: DraftFlow, event: DraftEvent, tz: Tz) -> Outcome {
    let DraftFlow { step, mut draft } = flow;

    match (step, event) {
        (DraftStep::AwaitingTarget, DraftEvent::Text(text)) if !text.trim().is_empty() => {
            draft.target = Some(text.trim().to_string());
            continue_with(DraftStep::AwaitingMedia, draft, Reply::AskMedia)
        }
        (DraftStep::AwaitingTarget, _) => continue_with(step, draft, Reply::AskTarget),

        (DraftStep::AwaitingMedia, DraftEvent::Media { kind, reference }) => {
            draft.media = Some((kind, reference));
            continue_with(DraftStep::AwaitingText, draft, Reply::AskText)
        }
        (DraftStep::AwaitingMedia, DraftEvent::SkipMedia) => {
            continue_with(DraftStep::AwaitingText, draft, Reply::AskText)
        }
        (DraftStep::AwaitingMedia, _) => continue_with(step, draft, Reply::AskMedia),

        (DraftStep::AwaitingText, DraftEvent::Text(text)) if !text.trim().is_empty() => {
            draft.text = Some(text);
            continue_with(DraftStep::AwaitingButtonDecision, draft, Reply::AskButtonDecision)
        }
        (DraftStep::AwaitingText, _) => continue_with(step, draft, Reply::AskText),

        (DraftStep::AwaitingButtonDecision, DraftEvent::Text(text)) if is_yes(&text) => {
            continue_with(DraftStep::AwaitingButtonLabel, draft, Reply::AskButtonLabel)
        }
        (DraftStep::AwaitingButtonDecision, DraftEvent::Text(text)) if is_no(&text) => {
            continue_with(DraftStep::AwaitingPinDecision, draft, Reply::AskPinDecision)
        }
        (DraftStep::AwaitingButtonDecision, _) => {
            continue_with(step, draft, Reply::ExpectedYesNo)
        }

        (DraftStep::AwaitingButtonLabel, DraftEvent::Text(text)) if !text.trim().is_empty() => {
            draft.pending_button_label = Some(text.trim().to_string());
            continue_with(DraftStep::AwaitingButtonUrl, draft, Reply::AskButtonUrl)
        }
        (DraftStep::AwaitingButtonLabel, _) => {
            continue_with(step, draft, Reply::AskButtonLabel)
        }

        (DraftStep::AwaitingButtonUrl, DraftEvent::Text(text)) if !text.trim().is_empty() => {
            // URL is stored as given; Telegram is the one to reject a bad one.
            let label = draft.pending_button_label.take().unwrap_or_default();
            draft.buttons.push(LinkButton {
                label,
                url: text.trim().to_string(),
            });
            // A single button is collected before moving on.
            continue_with(DraftStep::AwaitingPinDecision, draft, Reply::AskPinDecision)
        }
        (DraftStep::AwaitingButtonUrl, _) => continue_with(step, draft, Reply::AskButtonUrl),

        (DraftStep::AwaitingPinDecision, DraftEvent::Text(text)) if
            is_yes(&text) || is_no(&text)
        => {
            draft.pin_after_send = Some(is_yes(&text));
            match draft.kind {
                ScheduleKind::OneShot => {
                    continue_with(DraftStep::AwaitingFireTime, draft, Reply::AskFireTime)
                }
                ScheduleKind::Recurring => {
                    continue_with(DraftStep::AwaitingInterval, draft, Reply::AskInterval)
                }
            }
        }
        (DraftStep::AwaitingPinDecision, _) => continue_with(step, draft, Reply::ExpectedYesNo),

        (DraftStep::AwaitingFireTime, DraftEvent::Text(text)) => {
            match parse_civil_time(&text, tz) {
                Ok(at) => {
                    draft.fire_at = Some(at);
                    continue_with(DraftStep::AwaitingConfirmation, draft, Reply::AskConfirmation)
                }
                Err(_) => continue_with(step, draft, Reply::InvalidTime),
            }
        }
        (DraftStep::AwaitingFireTime, _) => continue_with(step, draft, Reply::InvalidTime),

        (DraftStep::AwaitingInterval, DraftEvent::Text(text)) => {
            match text.parse::<Interval>() {
                Ok(every) => {
                    draft.interval = Some(every);
                    continue_with(DraftStep::AwaitingRepetitions, draft, Reply::AskRepetitions)
                }
                Err(_) => continue_with(step, draft, Reply::InvalidInterval),
            }
        }
        (DraftStep::AwaitingInterval, _) => continue_with(step, draft, Reply::InvalidInterval),

        (DraftStep::AwaitingRepetitions, DraftEvent::Text(text)) => {
            match text.trim().parse::<u32>() {
                Ok(count) => {
                    draft.repetitions = Some(count);
                    continue_with(DraftStep::AwaitingStartTime, draft, Reply::AskStartTime)
                }
                Err(_) => continue_with(step, draft, Reply::InvalidRepetitions),
            }
        }
        (DraftStep::AwaitingRepetitions, _) => {
            continue_with(step, draft, Reply::InvalidRepetitions)
        }

        (DraftStep::AwaitingStartTime, DraftEvent::Text(text)) => {
            match parse_civil_time(&text, tz) {
                Ok(at) => {
                    draft.start_at = Some(at);
                    continue_with(DraftStep::AwaitingConfirmation, draft, Reply::AskConfirmation)
                }
                Err(_) => continue_with(step, draft, Reply::InvalidTime),
            }
        }
        (DraftStep::AwaitingStartTime, _) => continue_with(step, draft, Reply::InvalidTime),

        (DraftStep::AwaitingConfirmation, DraftEvent::Text(text)) if
            text.trim() == CONFIRM_TOKEN
        => Outcome::Committed(draft),
        (DraftStep::AwaitingConfirmation, DraftEvent::Text(text)) if
            text.trim() == CANCEL_TOKEN
        => Outcome::Cancelled,
        (DraftStep::AwaitingConfirmation, _) => {
            continue_with(step, draft, Reply::ExpectedConfirmation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Sao_Paulo;

    fn text(s: &str) -> DraftEvent {
        DraftEvent::Text(s.to_string())
    }

    /// Feed a text event expecting the flow to continue.
    fn feed(flow: DraftFlow, event: DraftEvent) -> (DraftFlow, Reply) {
        match advance(flow, event, Sao_Paulo) {
            Outcome::Continue { flow, reply } => (flow, reply),
            other => panic!("expected Continue, got {:?}", other),
        }
    }

    /// Walk a one-shot flow up to the confirmation step.
    fn one_shot_at_confirmation() -> DraftFlow {
        let flow = DraftFlow::new(ScheduleKind::OneShot);
        let (flow, _) = feed(flow, text("@channel1"));
        let (flow, _) = feed(flow, DraftEvent::SkipMedia);
        let (flow, _) = feed(flow, text("Hello"));
        let (flow, _) = feed(flow, text("No"));
        let (flow, _) = feed(flow, text("No"));
        let (flow, reply) = feed(flow, text("01/01/2030 10:00"));
        assert_eq!(reply, Reply::AskConfirmation);
        assert_eq!(flow.step, DraftStep::AwaitingConfirmation);
        flow
    }

    #[test]
    fn test_one_shot_flow_commits() {
        let flow = one_shot_at_confirmation();

        let draft = match advance(flow, text(CONFIRM_TOKEN), Sao_Paulo) {
            Outcome::Committed(draft) => draft,
            other => panic!("expected Committed, got {:?}", other),
        };

        let new = draft.finish(42).unwrap();
        assert_eq!(new.kind, ScheduleKind::OneShot);
        assert_eq!(new.owner_id, 42);
        assert_eq!(new.target, "@channel1");
        assert_eq!(new.text, "Hello");
        assert!(new.media.is_none());
        assert!(new.buttons.is_empty());
        assert!(!new.pin_after_send);
        assert!(new.start_at.is_none());
        assert!(new.interval.is_none());
        assert!(new.repetitions_remaining.is_none());

        // 10:00 in São Paulo (UTC-3) is 13:00 UTC
        let expected = Sao_Paulo.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(new.fire_at, Some(expected.with_timezone(&Utc)));
    }

    #[test]
    fn test_recurring_flow_collects_button_and_pin() {
        let flow = DraftFlow::new(ScheduleKind::Recurring);
        let (flow, _) = feed(flow, text("-100123"));
        let (flow, _) = feed(flow, DraftEvent::Media {
            kind: MediaKind::Photo,
            reference: "file-abc".to_string(),
        });
        let (flow, _) = feed(flow, text("Promo post"));
        let (flow, reply) = feed(flow, text("Yes"));
        assert_eq!(reply, Reply::AskButtonLabel);

        let (flow, _) = feed(flow, text("Open site"));
        let (flow, reply) = feed(flow, text("https://example.com"));
        // Only one button is collected; the flow moves straight to the pin step
        assert_eq!(reply, Reply::AskPinDecision);
        assert_eq!(flow.step, DraftStep::AwaitingPinDecision);

        let (flow, _) = feed(flow, text("Yes"));
        let (flow, _) = feed(flow, text("30m"));
        let (flow, _) = feed(flow, text("3"));
        let (flow, reply) = feed(flow, text("01/01/2025 08:00"));
        assert_eq!(reply, Reply::AskConfirmation);

        let draft = match advance(flow, text(CONFIRM_TOKEN), Sao_Paulo) {
            Outcome::Committed(draft) => draft,
            other => panic!("expected Committed, got {:?}", other),
        };

        let new = draft.finish(7).unwrap();
        assert_eq!(new.kind, ScheduleKind::Recurring);
        assert_eq!(new.media, Some((MediaKind::Photo, "file-abc".to_string())));
        assert_eq!(new.buttons, vec![LinkButton {
            label: "Open site".to_string(),
            url: "https://example.com".to_string(),
        }]);
        assert!(new.pin_after_send);
        assert_eq!(new.interval.unwrap().to_string(), "30m");
        assert_eq!(new.repetitions_remaining, Some(3));
        assert!(new.fire_at.is_none());

        let expected = Sao_Paulo.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(new.start_at, Some(expected.with_timezone(&Utc)));
    }

    #[test]
    fn test_invalid_time_keeps_state() {
        let flow = DraftFlow::new(ScheduleKind::OneShot);
        let (flow, _) = feed(flow, text("@channel1"));
        let (flow, _) = feed(flow, DraftEvent::SkipMedia);
        let (flow, _) = feed(flow, text("Hello"));
        let (flow, _) = feed(flow, text("No"));
        let (flow, _) = feed(flow, text("No"));

        let (flow, reply) = feed(flow, text("31/13/2025 25:61"));
        assert_eq!(reply, Reply::InvalidTime);
        assert_eq!(flow.step, DraftStep::AwaitingFireTime);
        assert!(flow.draft.fire_at.is_none());

        // A valid time afterwards still works
        let (flow, reply) = feed(flow, text("01/06/2031 09:30"));
        assert_eq!(reply, Reply::AskConfirmation);
        assert!(flow.draft.fire_at.is_some());
    }

    #[test]
    fn test_invalid_interval_and_repetitions_keep_state() {
        let flow = DraftFlow::new(ScheduleKind::Recurring);
        let (flow, _) = feed(flow, text("@c"));
        let (flow, _) = feed(flow, DraftEvent::SkipMedia);
        let (flow, _) = feed(flow, text("body"));
        let (flow, _) = feed(flow, text("No"));
        let (flow, _) = feed(flow, text("No"));

        let (flow, reply) = feed(flow, text("soon"));
        assert_eq!(reply, Reply::InvalidInterval);
        assert_eq!(flow.step, DraftStep::AwaitingInterval);

        let (flow, _) = feed(flow, text("12h"));
        let (flow, reply) = feed(flow, text("-1"));
        assert_eq!(reply, Reply::InvalidRepetitions);
        assert_eq!(flow.step, DraftStep::AwaitingRepetitions);

        let (flow, reply) = feed(flow, text("0"));
        assert_eq!(reply, Reply::AskStartTime);
        assert_eq!(flow.draft.repetitions, Some(0));
    }

    #[test]
    fn test_shape_mismatch_reissues_prompt() {
        // Media where text is expected
        let flow = DraftFlow::new(ScheduleKind::OneShot);
        let event = DraftEvent::Media {
            kind: MediaKind::Photo,
            reference: "f".to_string(),
        };
        let (flow, reply) = feed(flow, event);
        assert_eq!(reply, Reply::AskTarget);
        assert_eq!(flow.step, DraftStep::AwaitingTarget);
        assert!(flow.draft.target.is_none());

        // Text where media or skip is expected
        let (flow, _) = feed(flow, text("@channel1"));
        let (flow, reply) = feed(flow, text("just text"));
        assert_eq!(reply, Reply::AskMedia);
        assert_eq!(flow.step, DraftStep::AwaitingMedia);
        assert!(flow.draft.media.is_none());
    }

    #[test]
    fn test_yes_no_prompt_rejects_other_answers() {
        let flow = DraftFlow::new(ScheduleKind::OneShot);
        let (flow, _) = feed(flow, text("@channel1"));
        let (flow, _) = feed(flow, DraftEvent::SkipMedia);
        let (flow, _) = feed(flow, text("Hello"));

        let (flow, reply) = feed(flow, text("maybe"));
        assert_eq!(reply, Reply::ExpectedYesNo);
        assert_eq!(flow.step, DraftStep::AwaitingButtonDecision);

        // Case-insensitive match on the tokens
        let (flow, reply) = feed(flow, text("yes"));
        assert_eq!(reply, Reply::AskButtonLabel);
        assert_eq!(flow.step, DraftStep::AwaitingButtonLabel);
    }

    #[test]
    fn test_confirmation_accepts_exactly_two_tokens() {
        let flow = one_shot_at_confirmation();

        let (flow, reply) = feed(flow, text("ok fine"));
        assert_eq!(reply, Reply::ExpectedConfirmation);
        assert_eq!(flow.step, DraftStep::AwaitingConfirmation);

        match advance(flow, text(CANCEL_TOKEN), Sao_Paulo) {
            Outcome::Cancelled => {}
            other => panic!("expected Cancelled, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_civil_time_is_timezone_anchored() {
        let at = parse_civil_time("01/01/2030 10:00", Sao_Paulo).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2030, 1, 1, 13, 0, 0).unwrap());

        assert!(parse_civil_time("2030-01-01 10:00", Sao_Paulo).is_err());
        assert!(parse_civil_time("31/13/2025 25:61", Sao_Paulo).is_err());
    }

    #[test]
    fn test_summary_mentions_the_essentials() {
        let flow = one_shot_at_confirmation();
        let summary = flow.draft.summary(Sao_Paulo);

        assert!(summary.contains("One-shot"));
        assert!(summary.contains("@channel1"));
        assert!(summary.contains("01/01/2030 10:00"));
    }

    #[test]
    fn test_finish_rejects_incomplete_draft() {
        let flow = DraftFlow::new(ScheduleKind::OneShot);
        assert!(flow.draft.finish(1).is_err());
    }

    #[tokio::test]
    async fn test_committed_draft_round_trips_through_store() {
        use crate::db::ScheduleStore;
        use crate::test_support::MemoryStore;

        let flow = DraftFlow::new(ScheduleKind::Recurring);
        let (flow, _) = feed(flow, text("@announcements"));
        let (flow, _) = feed(flow, DraftEvent::Media {
            kind: MediaKind::Video,
            reference: "vid-9".to_string(),
        });
        let (flow, _) = feed(flow, text("Weekly digest"));
        let (flow, _) = feed(flow, text("Yes"));
        let (flow, _) = feed(flow, text("Read more"));
        let (flow, _) = feed(flow, text("https://example.com/digest"));
        let (flow, _) = feed(flow, text("Yes"));
        let (flow, _) = feed(flow, text("1d"));
        let (flow, _) = feed(flow, text("5"));
        let (flow, _) = feed(flow, text("02/03/2031 18:45"));

        let draft = match advance(flow, text(CONFIRM_TOKEN), Sao_Paulo) {
            Outcome::Committed(draft) => draft,
            other => panic!("expected Committed, got {:?}", other),
        };

        let store = MemoryStore::new();
        let created = store.create(draft.finish(99).unwrap()).await.unwrap();
        let read_back = store.get(created.id).await.unwrap().expect("record must exist");

        assert_eq!(read_back.owner_id, 99);
        assert_eq!(read_back.target, "@announcements");
        assert_eq!(read_back.text, "Weekly digest");
        assert_eq!(read_back.media_kind.as_deref(), Some("video"));
        assert_eq!(read_back.media_ref.as_deref(), Some("vid-9"));
        assert_eq!(read_back.buttons.0, vec![LinkButton {
            label: "Read more".to_string(),
            url: "https://example.com/digest".to_string(),
        }]);
        assert!(read_back.pin_after_send);
        assert_eq!(read_back.interval.as_deref(), Some("1d"));
        assert_eq!(read_back.repetitions_remaining, Some(5));
        assert_eq!(
            read_back.start_at,
            Some(
                Sao_Paulo
                    .with_ymd_and_hms(2031, 3, 2, 18, 45, 0)
                    .unwrap()
                    .with_timezone(&Utc)
            )
        );
    }
}
