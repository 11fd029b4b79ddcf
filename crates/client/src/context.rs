//! Front-end session state.
//!
//! [`ClientContext`] ties the gateway to the pure state machines in
//! `fleetcheck_core`: the signed-in session, the screen navigator, the
//! inspection being captured and the quality report being signed. Every screen change goes through
//! [`ClientContext::navigate`], so an anonymous user never reaches a
//! protected screen and only managers reach user management.

use fleetcheck_core::checklist::ChecklistItem;
use fleetcheck_core::error::CoreError;
use fleetcheck_core::inspection::{InspectionSession, PreInspectionMeta, Severity, StepBack};
use fleetcheck_core::navigation::{Navigator, Screen};
use fleetcheck_core::quality_report::{FinalizedQualityReport, QualityReportDraft, QualityReportForm};
use fleetcheck_core::signature::{FinalizedInspection, Inspector, SignatureGate, Signer};
use fleetcheck_core::types::{DbId, Timestamp};

use crate::error::ClientError;
use crate::gateway::{FleetcheckClient, HttpInspectionSink, HttpQualityReportSink};
use crate::models::{AuthResponse, Profile, SignUpRequest};

/// Tokens and profile of the signed-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: DbId,
    pub profile: Profile,
}

impl AuthSession {
    pub fn role(&self) -> &str {
        &self.profile.role
    }

    /// Identity stamped onto records this user finalizes.
    pub fn inspector(&self) -> Inspector {
        Inspector {
            id: self.user_id,
            name: self.profile.full_name.clone(),
        }
    }
}

impl From<AuthResponse> for AuthSession {
    fn from(auth: AuthResponse) -> Self {
        Self {
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            user_id: auth.profile.user_id,
            profile: auth.profile,
        }
    }
}

/// Where the current inspection is in its lifecycle.
#[derive(Debug, Clone)]
pub enum Capture {
    /// Walking the checklist.
    Checklist(InspectionSession),
    /// Checklist done; waiting for driver and inspector signatures.
    Signing(SignatureGate),
}

#[derive(Debug)]
pub struct ClientContext {
    gateway: FleetcheckClient,
    session: Option<AuthSession>,
    navigator: Navigator,
    capture: Option<Capture>,
    report: Option<QualityReportForm>,
}

impl ClientContext {
    pub fn new(gateway: FleetcheckClient) -> Self {
        Self {
            gateway,
            session: None,
            navigator: Navigator::default(),
            capture: None,
            report: None,
        }
    }

    pub fn gateway(&self) -> &FleetcheckClient {
        &self.gateway
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.navigator.current()
    }

    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    pub fn quality_report(&self) -> Option<&QualityReportForm> {
        self.report.as_ref()
    }

    fn require_session(&self) -> Result<&AuthSession, CoreError> {
        self.session
            .as_ref()
            .ok_or_else(|| CoreError::Unauthorized("Sign in required".into()))
    }

    /// Access token of the signed-in user.
    pub fn token(&self) -> Result<&str, ClientError> {
        Ok(self.require_session()?.access_token.as_str())
    }

    // ---- session ---------------------------------------------------------

    /// Adopt a freshly issued session and land on the dashboard.
    pub fn establish(&mut self, auth: AuthResponse) {
        tracing::info!(user_id = auth.profile.user_id, role = %auth.profile.role, "Signed in");
        self.session = Some(auth.into());
        self.capture = None;
        self.report = None;
        self.navigator.reset_to(Screen::Dashboard);
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let auth = self.gateway.sign_in(email, password).await?;
        self.establish(auth);
        Ok(())
    }

    pub async fn sign_up(&mut self, input: &SignUpRequest) -> Result<(), ClientError> {
        let auth = self.gateway.sign_up(input).await?;
        self.establish(auth);
        Ok(())
    }

    /// Complete a password reset: the code signs the user in.
    pub async fn verify_code(&mut self, email: &str, code: &str) -> Result<(), ClientError> {
        let auth = self.gateway.verify_code(email, code).await?;
        self.establish(auth);
        Ok(())
    }

    /// Rotate tokens without leaving the current screen.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let refresh_token = self.require_session()?.refresh_token.clone();
        let auth = self.gateway.refresh(&refresh_token).await?;
        self.session = Some(auth.into());
        Ok(())
    }

    /// Drop the session locally and revoke it on the server.
    ///
    /// Local state is always cleared, even when the server call fails.
    pub async fn sign_out(&mut self) -> Result<(), ClientError> {
        let session = self.session.take();
        self.capture = None;
        self.report = None;
        self.navigator.reset_to(Screen::SignIn);

        if let Some(session) = session {
            if let Err(err) = self.gateway.sign_out(&session.access_token).await {
                tracing::warn!(error = %err, "Server sign-out failed; local session cleared");
                return Err(err);
            }
        }
        Ok(())
    }

    // ---- navigation ----------------------------------------------------------

    /// Move to `next`, enforcing sign-in and the manager-only screens.
    pub fn navigate(&mut self, next: Screen) -> Result<(), CoreError> {
        if !next.requires_auth() {
            return self.navigator.navigate(next);
        }
        let role = self.require_session()?.role().to_string();
        self.navigator.navigate_as(&role, next)
    }

    pub fn back(&mut self) -> Option<Screen> {
        self.navigator.back()
    }

    // ---- inspection capture --------------------------------------------------

    /// Validate the pre-inspection details and open the checklist.
    pub fn begin_inspection(
        &mut self,
        catalog: Vec<ChecklistItem>,
        meta: PreInspectionMeta,
    ) -> Result<(), CoreError> {
        self.require_session()?;
        let session = InspectionSession::start(catalog, meta)?;
        self.navigate(Screen::Inspection)?;
        self.capture = Some(Capture::Checklist(session));
        Ok(())
    }

    fn checklist_mut(&mut self) -> Result<&mut InspectionSession, CoreError> {
        match self.capture.as_mut() {
            Some(Capture::Checklist(session)) => Ok(session),
            _ => Err(CoreError::Validation("No checklist in progress".into())),
        }
    }

    pub fn record_pass(&mut self) -> Result<(), CoreError> {
        self.checklist_mut()?.record_pass()
    }

    pub fn record_fail(
        &mut self,
        severity: Option<Severity>,
        note: Option<String>,
        photo: Option<String>,
    ) -> Result<(), CoreError> {
        self.checklist_mut()?.record_fail(severity, note, photo)
    }

    /// Undo the last answer. At the first item this returns
    /// [`StepBack::CancelRequested`] and leaves the session alone; call
    /// [`cancel_inspection`](Self::cancel_inspection) once the user confirms.
    pub fn step_back(&mut self) -> Result<StepBack, CoreError> {
        Ok(self.checklist_mut()?.step_back())
    }

    /// Discard the inspection and return to the dashboard.
    pub fn cancel_inspection(&mut self) {
        self.capture = None;
        if self.session.is_some() {
            self.navigator.reset_to(Screen::Dashboard);
        }
    }

    /// Close the checklist and move to the signature screen.
    pub fn finish_checklist(&mut self) -> Result<(), CoreError> {
        let session = match self.capture.take() {
            Some(Capture::Checklist(session)) => session,
            other => {
                self.capture = other;
                return Err(CoreError::Validation("No checklist in progress".into()));
            }
        };
        let completed = match session.clone().complete() {
            Ok(completed) => completed,
            Err(err) => {
                self.capture = Some(Capture::Checklist(session));
                return Err(err);
            }
        };
        if let Err(err) = self.navigate(Screen::Signatures) {
            self.capture = Some(Capture::Checklist(session));
            return Err(err);
        }
        self.capture = Some(Capture::Signing(SignatureGate::new(completed)));
        Ok(())
    }

    fn gate_mut(&mut self) -> Result<&mut SignatureGate, CoreError> {
        match self.capture.as_mut() {
            Some(Capture::Signing(gate)) => Ok(gate),
            _ => Err(CoreError::Validation("Nothing is waiting for signatures".into())),
        }
    }

    pub fn sign(&mut self, signer: Signer, image: impl Into<String>) -> Result<(), CoreError> {
        self.gate_mut()?.set_signature(signer, image)
    }

    /// Submit the signed inspection. On success the capture is cleared and
    /// the user is returned to the dashboard; on failure nothing changes so
    /// the user can retry.
    pub async fn submit_inspection(&mut self, now: Timestamp) -> Result<FinalizedInspection, ClientError> {
        let session = self.require_session()?;
        let gate = match self.capture.as_ref() {
            Some(Capture::Signing(gate)) => gate,
            _ => {
                return Err(CoreError::Validation("Nothing is waiting for signatures".into()).into())
            }
        };
        let sink = HttpInspectionSink::new(&self.gateway, &session.access_token);
        let stored = gate.submit(&sink, &session.inspector(), now).await?;

        self.capture = None;
        self.navigator.reset_to(Screen::Dashboard);
        Ok(stored)
    }

    // ---- quality report ------------------------------------------------------

    /// Validate `draft` and open it for signing on the quality report screen.
    pub fn begin_quality_report(&mut self, draft: QualityReportDraft) -> Result<(), CoreError> {
        self.require_session()?;
        let form = QualityReportForm::new(draft)?;
        if self.screen() != Screen::QualityReport {
            self.navigate(Screen::QualityReport)?;
        }
        self.report = Some(form);
        Ok(())
    }

    fn report_mut(&mut self) -> Result<&mut QualityReportForm, CoreError> {
        self.report
            .as_mut()
            .ok_or_else(|| CoreError::Validation("No quality report in progress".into()))
    }

    /// `signer` must be [`Signer::Inspector`] or [`Signer::Sealer`].
    pub fn sign_quality_report(&mut self, signer: Signer, image: impl Into<String>) -> Result<(), CoreError> {
        self.report_mut()?.set_signature(signer, image)
    }

    pub fn cancel_quality_report(&mut self) {
        self.report = None;
        if self.session.is_some() {
            self.navigator.reset_to(Screen::Dashboard);
        }
    }

    /// Submit the signed report. Same contract as
    /// [`submit_inspection`](Self::submit_inspection).
    pub async fn submit_quality_report(
        &mut self,
        now: Timestamp,
    ) -> Result<FinalizedQualityReport, ClientError> {
        let session = self.require_session()?;
        let form = self
            .report
            .as_ref()
            .ok_or_else(|| CoreError::Validation("No quality report in progress".into()))?;
        let sink = HttpQualityReportSink::new(&self.gateway, &session.access_token);
        let stored = form.submit(&sink, &session.inspector(), now).await?;

        self.report = None;
        self.navigator.reset_to(Screen::Dashboard);
        Ok(stored)
    }
}
