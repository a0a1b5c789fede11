//! Inspection session state machine
//!
//! A session moves through four states:
//!
//! ```text
//! AwaitingInput --ChecklistGenerated--> ChecklistReady
//! ChecklistReady --DetailsSubmitted--> ChecklistReady (details stored)
//! ChecklistReady --BeginInspection--> InspectionInProgress   (details required)
//! InspectionInProgress --AnswersSubmitted--> ReportReady     (answers scored)
//! any --Reset--> AwaitingInput
//! ```
//!
//! An empty checklist means the trip description was not about vehicles;
//! the session drops back to `AwaitingInput`.

use crate::models::{ChecklistError, FullChecklist, SubmittedAnswers};
use crate::scoring::{self, SummaryStatistics};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PLATE_PATTERN: &str = r"^[A-Z]{3}-\d{3}[A-Z]{2}$";

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"))
}

fn plate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLATE_PATTERN).expect("valid plate regex"))
}

/// Rejected inspector details
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DetailsError {
    #[error("Please enter your full name.")]
    MissingName,

    #[error("Please enter a valid name (letters, spaces, and hyphens only).")]
    InvalidName,

    #[error("Name must be at least 2 characters long.")]
    NameTooShort,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a valid Vehicle Plate Number in the format AAA-123AA.")]
    InvalidPlate,
}

/// Who is inspecting which vehicle. Only constructible through
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorDetails {
    name: String,
    email: String,
    plate: String,
}

impl InspectorDetails {
    pub fn new(name: &str, email: &str, plate: &str) -> Result<Self, DetailsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DetailsError::MissingName);
        }
        if !name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-')
        {
            return Err(DetailsError::InvalidName);
        }
        if name.chars().count() < 2 {
            return Err(DetailsError::NameTooShort);
        }

        let email = email.trim();
        if !email_re().is_match(email) {
            return Err(DetailsError::InvalidEmail);
        }

        let plate = plate.trim().to_uppercase();
        if !plate_re().is_match(&plate) {
            return Err(DetailsError::InvalidPlate);
        }

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            plate,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Uppercased plate number
    pub fn plate(&self) -> &str {
        &self.plate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingInput,
    ChecklistReady {
        checklist: FullChecklist,
        details: Option<InspectorDetails>,
    },
    InspectionInProgress {
        checklist: FullChecklist,
        details: InspectorDetails,
    },
    ReportReady {
        checklist: FullChecklist,
        details: InspectorDetails,
        answers: SubmittedAnswers,
        summary: SummaryStatistics,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingInput => "awaiting input",
            SessionState::ChecklistReady { .. } => "checklist ready",
            SessionState::InspectionInProgress { .. } => "inspection in progress",
            SessionState::ReportReady { .. } => "report ready",
        }
    }

    pub fn checklist(&self) -> Option<&FullChecklist> {
        match self {
            SessionState::AwaitingInput => None,
            SessionState::ChecklistReady { checklist, .. }
            | SessionState::InspectionInProgress { checklist, .. }
            | SessionState::ReportReady { checklist, .. } => Some(checklist),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    ChecklistGenerated(FullChecklist),
    DetailsSubmitted(InspectorDetails),
    BeginInspection,
    AnswersSubmitted(SubmittedAnswers),
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::ChecklistGenerated(_) => "checklist generated",
            SessionEvent::DetailsSubmitted(_) => "details submitted",
            SessionEvent::BeginInspection => "begin inspection",
            SessionEvent::AnswersSubmitted(_) => "answers submitted",
            SessionEvent::Reset => "reset",
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Your request was not related to vehicle inspection or trip preparation. Please enter a vehicle-related query.")]
    OutOfScope,

    #[error("Inspector details must be submitted before the inspection can begin")]
    MissingDetails,

    #[error("Invalid checklist: {0}")]
    InvalidChecklist(#[from] ChecklistError),

    #[error("Cannot apply '{event}' while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

/// Compute the state that follows `state` on `event`
pub fn transition(state: &SessionState, event: SessionEvent) -> Result<SessionState, SessionError> {
    match (state, event) {
        (_, SessionEvent::Reset) => Ok(SessionState::AwaitingInput),

        (SessionState::AwaitingInput, SessionEvent::ChecklistGenerated(checklist)) => {
            if checklist.is_empty() {
                return Err(SessionError::OutOfScope);
            }
            checklist.validate()?;
            Ok(SessionState::ChecklistReady {
                checklist,
                details: None,
            })
        }

        (SessionState::ChecklistReady { checklist, .. }, SessionEvent::DetailsSubmitted(details)) => {
            Ok(SessionState::ChecklistReady {
                checklist: checklist.clone(),
                details: Some(details),
            })
        }

        (SessionState::ChecklistReady { checklist, details }, SessionEvent::BeginInspection) => {
            let details = details.clone().ok_or(SessionError::MissingDetails)?;
            Ok(SessionState::InspectionInProgress {
                checklist: checklist.clone(),
                details,
            })
        }

        (
            SessionState::InspectionInProgress { checklist, details },
            SessionEvent::AnswersSubmitted(answers),
        ) => {
            let summary = scoring::score(checklist, &answers);
            Ok(SessionState::ReportReady {
                checklist: checklist.clone(),
                details: details.clone(),
                answers,
                summary,
            })
        }

        (state, event) => Err(SessionError::InvalidTransition {
            state: state.name(),
            event: event.name(),
        }),
    }
}

/// One user's pass through the wizard
#[derive(Debug)]
pub struct InspectionSession {
    id: Uuid,
    state: SessionState,
    /// Bumped on every reset so stale form submissions can be told apart
    form_generation: u32,
}

impl Default for InspectionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectionSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::AwaitingInput,
            form_generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn form_generation(&self) -> u32 {
        self.form_generation
    }

    /// Apply an event. On an out-of-scope checklist the session resets;
    /// any other error leaves the state untouched.
    pub fn apply(&mut self, event: SessionEvent) -> Result<&SessionState, SessionError> {
        let event_name = event.name();
        if matches!(event, SessionEvent::Reset) {
            self.reset();
            return Ok(&self.state);
        }

        match transition(&self.state, event) {
            Ok(next) => {
                debug!(
                    "Session {}: {} --{}--> {}",
                    self.id,
                    self.state.name(),
                    event_name,
                    next.name()
                );
                self.state = next;
                Ok(&self.state)
            }
            Err(SessionError::OutOfScope) => {
                info!("Session {}: checklist empty, resetting", self.id);
                self.reset();
                Err(SessionError::OutOfScope)
            }
            Err(e) => Err(e),
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::AwaitingInput;
        self.form_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKey, ChecklistGroup, ChecklistItem, ChecklistType};

    fn checklist() -> FullChecklist {
        FullChecklist::new(vec![ChecklistGroup {
            name: "Lights".into(),
            id: "g1".into(),
            serial_no: 1,
            items: vec![ChecklistItem {
                name: "Do the headlights work?".into(),
                serial_no: 1,
                id: "i1".into(),
                item_type: ChecklistType::YesNo,
            }],
        }])
    }

    fn details() -> InspectorDetails {
        InspectorDetails::new("Chidi Okafor", "chidi@example.com", "LAG-456KD").unwrap()
    }

    #[test]
    fn test_details_validation() {
        assert_eq!(
            InspectorDetails::new("  ", "a@b.co", "ABC-123DE"),
            Err(DetailsError::MissingName)
        );
        assert_eq!(
            InspectorDetails::new("R2D2", "a@b.co", "ABC-123DE"),
            Err(DetailsError::InvalidName)
        );
        assert_eq!(
            InspectorDetails::new("A", "a@b.co", "ABC-123DE"),
            Err(DetailsError::NameTooShort)
        );
        assert_eq!(
            InspectorDetails::new("Mary-Jane Doe", "not-an-email", "ABC-123DE"),
            Err(DetailsError::InvalidEmail)
        );
        assert_eq!(
            InspectorDetails::new("Mary-Jane Doe", "mj@example.com", "AB-1234"),
            Err(DetailsError::InvalidPlate)
        );
        let ok = InspectorDetails::new("Mary-Jane Doe", "mj@example.com", "abc-123de").unwrap();
        assert_eq!(ok.plate(), "ABC-123DE");
    }

    #[test]
    fn test_full_flow_reaches_report_ready() {
        let mut session = InspectionSession::new();
        session
            .apply(SessionEvent::ChecklistGenerated(checklist()))
            .unwrap();
        session.apply(SessionEvent::DetailsSubmitted(details())).unwrap();
        session.apply(SessionEvent::BeginInspection).unwrap();
        let answers = SubmittedAnswers::new().with(AnswerKey::new("g1", "i1", 1), Some("Yes"));
        let state = session.apply(SessionEvent::AnswersSubmitted(answers)).unwrap();

        match state {
            SessionState::ReportReady { summary, .. } => {
                assert_eq!(summary.passed_count, 1);
                assert_eq!(summary.passed_percentage, 100.0);
            }
            other => panic!("unexpected state {}", other.name()),
        }
    }

    #[test]
    fn test_begin_requires_details() {
        let mut session = InspectionSession::new();
        session
            .apply(SessionEvent::ChecklistGenerated(checklist()))
            .unwrap();
        let err = session.apply(SessionEvent::BeginInspection).unwrap_err();
        assert!(matches!(err, SessionError::MissingDetails));
        assert_eq!(session.state().name(), "checklist ready");
    }

    #[test]
    fn test_empty_checklist_resets_session() {
        let mut session = InspectionSession::new();
        let err = session
            .apply(SessionEvent::ChecklistGenerated(FullChecklist::default()))
            .unwrap_err();
        assert!(matches!(err, SessionError::OutOfScope));
        assert_eq!(*session.state(), SessionState::AwaitingInput);
        assert_eq!(session.form_generation(), 1);
    }

    #[test]
    fn test_duplicate_keys_rejected_on_load() {
        let mut dup = checklist();
        let group = dup.groups[0].clone();
        dup.groups.push(group);
        let err = transition(&SessionState::AwaitingInput, SessionEvent::ChecklistGenerated(dup))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidChecklist(_)));
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut session = InspectionSession::new();
        let err = session.apply(SessionEvent::BeginInspection).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidTransition {
                state: "awaiting input",
                event: "begin inspection"
            }
        ));
        assert_eq!(*session.state(), SessionState::AwaitingInput);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = InspectionSession::new();
        session
            .apply(SessionEvent::ChecklistGenerated(checklist()))
            .unwrap();
        session.apply(SessionEvent::Reset).unwrap();
        assert_eq!(*session.state(), SessionState::AwaitingInput);
        assert!(session.state().checklist().is_none());
        assert_eq!(session.form_generation(), 1);
    }

    #[test]
    fn test_id_is_stable_across_transitions() {
        let mut session = InspectionSession::new();
        let id = session.id();
        session
            .apply(SessionEvent::ChecklistGenerated(checklist()))
            .unwrap();
        session.apply(SessionEvent::Reset).unwrap();
        assert_eq!(session.id(), id);
        assert_ne!(InspectionSession::new().id(), id);
    }
}
