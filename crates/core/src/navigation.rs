//! Front-end screen state machine.
//!
//! The set of screens is closed and every move goes through an explicit
//! transition table, so a front end cannot land on a screen it has no route
//! to. Sign-out and sign-in use [`Navigator::reset_to`], which bypasses the
//! table and clears the back stack.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::ROLE_MANAGER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    SignIn,
    SignUp,
    ResetPassword,
    Dashboard,
    PreInspection,
    Inspection,
    Signatures,
    History,
    InspectionDetail,
    QualityReport,
    Profile,
    UserManagement,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::ResetPassword => "reset_password",
            Self::Dashboard => "dashboard",
            Self::PreInspection => "pre_inspection",
            Self::Inspection => "inspection",
            Self::Signatures => "signatures",
            Self::History => "history",
            Self::InspectionDetail => "inspection_detail",
            Self::QualityReport => "quality_report",
            Self::Profile => "profile",
            Self::UserManagement => "user_management",
        }
    }

    /// Screens reachable in one step from `self`.
    ///
    /// - sign_in           -> sign_up, reset_password, dashboard
    /// - sign_up           -> sign_in, dashboard
    /// - reset_password    -> sign_in, dashboard
    /// - dashboard         -> pre_inspection, history, quality_report, profile, user_management
    /// - pre_inspection    -> inspection, dashboard
    /// - inspection        -> signatures, pre_inspection, dashboard
    /// - signatures        -> inspection, dashboard
    /// - history           -> inspection_detail, dashboard
    /// - inspection_detail -> history
    /// - quality_report    -> dashboard
    /// - profile           -> dashboard
    /// - user_management   -> dashboard
    pub fn transitions(&self) -> &'static [Screen] {
        use Screen::*;
        match self {
            SignIn => &[SignUp, ResetPassword, Dashboard],
            SignUp => &[SignIn, Dashboard],
            ResetPassword => &[SignIn, Dashboard],
            Dashboard => &[PreInspection, History, QualityReport, Profile, UserManagement],
            PreInspection => &[Inspection, Dashboard],
            Inspection => &[Signatures, PreInspection, Dashboard],
            Signatures => &[Inspection, Dashboard],
            History => &[InspectionDetail, Dashboard],
            InspectionDetail => &[History],
            QualityReport => &[Dashboard],
            Profile => &[Dashboard],
            UserManagement => &[Dashboard],
        }
    }

    pub fn can_transition_to(&self, next: Screen) -> bool {
        self.transitions().contains(&next)
    }

    /// Screens that need a signed-in user.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::SignIn | Self::SignUp | Self::ResetPassword)
    }

    pub fn requires_manager(&self) -> bool {
        matches!(self, Self::UserManagement)
    }
}

/// Current screen plus a back stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Screen::SignIn)
    }
}

impl Navigator {
    pub fn new(start: Screen) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.current
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }

    /// Move to `next` if the table allows it.
    pub fn navigate(&mut self, next: Screen) -> Result<(), CoreError> {
        if !self.current.can_transition_to(next) {
            return Err(CoreError::Validation(format!(
                "Cannot navigate from '{}' to '{}'",
                self.current.as_str(),
                next.as_str()
            )));
        }
        self.history.push(self.current);
        self.current = next;
        Ok(())
    }

    /// Like [`navigate`](Self::navigate) but also checks the user's role.
    pub fn navigate_as(&mut self, role: &str, next: Screen) -> Result<(), CoreError> {
        if next.requires_manager() && role != ROLE_MANAGER {
            return Err(CoreError::Forbidden(format!(
                "'{}' is only available to managers",
                next.as_str()
            )));
        }
        self.navigate(next)
    }

    /// Return to the previous screen. `None` when the back stack is empty.
    pub fn back(&mut self) -> Option<Screen> {
        let prev = self.history.pop()?;
        self.current = prev;
        Some(prev)
    }

    /// Jump to `screen` and forget the back stack.
    pub fn reset_to(&mut self, screen: Screen) {
        self.history.clear();
        self.current = screen;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::ROLE_INSPECTOR;

    #[test]
    fn starts_at_sign_in() {
        let nav = Navigator::default();
        assert_eq!(nav.current(), Screen::SignIn);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn inspection_flow() {
        let mut nav = Navigator::new(Screen::Dashboard);
        nav.navigate(Screen::PreInspection).unwrap();
        nav.navigate(Screen::Inspection).unwrap();
        nav.navigate(Screen::Signatures).unwrap();
        nav.navigate(Screen::Dashboard).unwrap();
        assert_eq!(nav.current(), Screen::Dashboard);
        assert_eq!(nav.history().len(), 4);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let mut nav = Navigator::new(Screen::SignIn);
        assert_matches!(nav.navigate(Screen::Signatures), Err(CoreError::Validation(_)));
        assert_eq!(nav.current(), Screen::SignIn);
    }

    #[test]
    fn back_walks_the_stack() {
        let mut nav = Navigator::new(Screen::Dashboard);
        nav.navigate(Screen::History).unwrap();
        nav.navigate(Screen::InspectionDetail).unwrap();
        assert_eq!(nav.back(), Some(Screen::History));
        assert_eq!(nav.back(), Some(Screen::Dashboard));
        assert_eq!(nav.back(), None);
        assert_eq!(nav.current(), Screen::Dashboard);
    }

    #[test]
    fn reset_clears_history() {
        let mut nav = Navigator::new(Screen::Dashboard);
        nav.navigate(Screen::Profile).unwrap();
        nav.reset_to(Screen::SignIn);
        assert_eq!(nav.current(), Screen::SignIn);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn user_management_is_manager_only() {
        let mut nav = Navigator::new(Screen::Dashboard);
        assert_matches!(
            nav.navigate_as(ROLE_INSPECTOR, Screen::UserManagement),
            Err(CoreError::Forbidden(_))
        );
        assert_eq!(nav.current(), Screen::Dashboard);
        nav.navigate_as(ROLE_MANAGER, Screen::UserManagement).unwrap();
        assert_eq!(nav.current(), Screen::UserManagement);
    }

    #[test]
    fn every_target_is_distinct_from_source() {
        use Screen::*;
        for s in [
            SignIn, SignUp, ResetPassword, Dashboard, PreInspection, Inspection, Signatures,
            History, InspectionDetail, QualityReport, Profile, UserManagement,
        ] {
            assert!(!s.can_transition_to(s), "{} loops to itself", s.as_str());
        }
    }

    #[test]
    fn auth_screens_do_not_require_auth() {
        assert!(!Screen::SignIn.requires_auth());
        assert!(Screen::Dashboard.requires_auth());
    }
}
