use crate::domain::validation::ValidationError;
use crate::domain::value::{AccountId, Label, Password, ProviderCode, Username};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One configured gateway account: credentials plus provider routing.
pub struct Account {
    pub id: AccountId,
    pub label: Label,
    pub username: Username,
    pub password: Password,
    pub provider: ProviderCode,
    /// Human-readable provider name; informational only.
    pub display_provider: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Completeness of an [`AccountDraft`].
pub enum DraftState {
    /// Every required field is populated.
    Valid,
    /// No required field is populated; safe to drop silently.
    Empty,
    /// Partially filled in; the user has to decide what to do.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Unvalidated account values as edited by a user.
///
/// `listed_provider` is the value picked from the list of known providers. When it is
/// [`ProviderCode::CUSTOM`], the effective provider is the free text in `custom_provider`.
pub struct AccountDraft {
    pub id: AccountId,
    pub label: String,
    pub listed_provider: String,
    pub custom_provider: String,
    pub display_provider: String,
    pub username: String,
    pub password: String,
}

impl AccountDraft {
    /// A blank draft for `id`.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            label: String::new(),
            listed_provider: String::new(),
            custom_provider: String::new(),
            display_provider: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }

    /// Provider code that will be sent to the gateway.
    pub fn effective_provider(&self) -> &str {
        if self.listed_provider == ProviderCode::CUSTOM {
            &self.custom_provider
        } else {
            &self.listed_provider
        }
    }

    pub fn state(&self) -> DraftState {
        let filled = [
            !self.label.trim().is_empty(),
            !self.effective_provider().trim().is_empty(),
            !self.username.trim().is_empty(),
            !self.password.is_empty(),
        ];

        if filled.iter().all(|it| *it) {
            DraftState::Valid
        } else if filled.iter().all(|it| !*it) {
            DraftState::Empty
        } else {
            DraftState::Invalid
        }
    }

    /// Validate the draft into an [`Account`].
    pub fn to_account(&self) -> Result<Account, ValidationError> {
        let display_provider = Some(self.display_provider.trim())
            .filter(|it| !it.is_empty())
            .map(str::to_owned);

        Ok(Account {
            id: self.id,
            label: Label::new(self.label.as_str())?,
            username: Username::new(self.username.as_str())?,
            password: Password::new(self.password.as_str())?,
            provider: ProviderCode::new(self.effective_provider())?,
            display_provider,
        })
    }
}

#[derive(Debug, Clone)]
/// Editing flow for a single account.
///
/// `Editing -> finish()` ends in one of [`EditOutcome`]'s variants; a prompt either
/// discards the draft or goes back to editing.
pub struct EditSession {
    draft: AccountDraft,
}

#[derive(Debug, Clone)]
pub enum EditOutcome {
    /// All fields are present; persist the account.
    Save(Account),
    /// Nothing was filled in; drop the account without asking.
    Discard { id: AccountId },
    /// Some fields are missing; ask before throwing the edits away.
    ConfirmPrompt(PendingDiscard),
}

#[derive(Debug, Clone)]
/// A partially filled draft waiting for the user's decision.
pub struct PendingDiscard {
    draft: AccountDraft,
}

impl EditSession {
    pub fn new(draft: AccountDraft) -> Self {
        Self { draft }
    }

    pub fn draft(&self) -> &AccountDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut AccountDraft {
        &mut self.draft
    }

    /// Leave the editor.
    pub fn finish(self) -> EditOutcome {
        match self.draft.state() {
            DraftState::Valid => match self.draft.to_account() {
                Ok(account) => EditOutcome::Save(account),
                Err(_) => EditOutcome::ConfirmPrompt(PendingDiscard { draft: self.draft }),
            },
            DraftState::Empty => EditOutcome::Discard { id: self.draft.id },
            DraftState::Invalid => EditOutcome::ConfirmPrompt(PendingDiscard { draft: self.draft }),
        }
    }
}

impl PendingDiscard {
    pub fn draft(&self) -> &AccountDraft {
        &self.draft
    }

    /// Return to editing with the values kept.
    pub fn resume(self) -> EditSession {
        EditSession { draft: self.draft }
    }

    /// Throw the edits away; returns the id whose stored values should be removed.
    pub fn discard(self) -> AccountId {
        self.draft.id
    }
}
