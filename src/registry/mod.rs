//! Registry layer: the configured accounts as seen through preference storage.
//!
//! Each account is stored under keys of the form `account_<id>_<field>`, e.g.
//! `account_2_label` holds the label of account 2.

mod store;

pub use store::{MemoryStore, PreferenceStore};

use crate::domain::{
    Account, AccountDraft, AccountId, Label, Password, ProviderCode, Username, ValidationError,
};

const KEY_PREFIX: &str = "account_";
const LISTED_PROVIDER_FIELD: &str = "listedprov";
const DISPLAY_PROVIDER_FIELD: &str = "displayprov";
const COOKIES_FIELD: &str = "cookies";

fn key(id: AccountId, field: &str) -> String {
    format!("{KEY_PREFIX}{id}_{field}")
}

/// Extract the id part of `account_<id>_<field>`, if `key` has that shape.
fn id_part<'a>(key: &'a str, field: &str) -> Option<&'a str> {
    key.strip_prefix(KEY_PREFIX)?
        .strip_suffix(field)?
        .strip_suffix('_')
}

#[derive(Debug, Clone)]
/// Account view over a [`PreferenceStore`].
pub struct AccountRegistry<S> {
    store: S,
}

impl<S: PreferenceStore> AccountRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Ids of all accounts that have a label, in ascending numeric order.
    ///
    /// Keys whose id part is not a number are skipped.
    pub fn list_account_ids(&self) -> Vec<AccountId> {
        let mut ids = self
            .store
            .keys()
            .iter()
            .filter_map(|key| {
                let raw = id_part(key, Label::FIELD)?;
                match raw.parse::<AccountId>() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        tracing::warn!(key = %key, error = %err, "skipping malformed account key");
                        None
                    }
                }
            })
            .collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// One past the highest known id, or [`AccountId::FIRST`] when there are none.
    ///
    /// Fails once the highest id is `u32::MAX` rather than handing out a used id.
    pub fn next_account_id(&self) -> Result<AccountId, ValidationError> {
        match self.list_account_ids().last() {
            None => Ok(AccountId::FIRST),
            Some(id) => id.next().ok_or(ValidationError::AccountIdsExhausted),
        }
    }

    /// Whether any account is routed through `provider`.
    pub fn is_provider_configured(&self, provider: &str) -> bool {
        self.store.keys().iter().any(|key| {
            id_part(key, ProviderCode::FIELD).is_some()
                && self.store.get(key).as_deref() == Some(provider)
        })
    }

    fn field(&self, id: AccountId, field: &str) -> Option<String> {
        self.store.get(&key(id, field))
    }

    /// Load one account; `None` if it is missing or incomplete.
    pub fn account(&self, id: AccountId) -> Option<Account> {
        match self.load(id) {
            Ok(account) => Some(account),
            Err(err) => {
                tracing::warn!(account = %id, error = %err, "ignoring incomplete account");
                None
            }
        }
    }

    fn load(&self, id: AccountId) -> Result<Account, ValidationError> {
        let value = |field: &str| self.field(id, field).unwrap_or_default();
        let display_provider = self
            .field(id, DISPLAY_PROVIDER_FIELD)
            .filter(|it| !it.trim().is_empty());

        Ok(Account {
            id,
            label: Label::new(value(Label::FIELD))?,
            username: Username::new(value(Username::FIELD))?,
            password: Password::new(value(Password::FIELD))?,
            provider: ProviderCode::new(value(ProviderCode::FIELD))?,
            display_provider,
        })
    }

    /// All usable accounts, ordered by id. Keys naming the same id yield one account.
    pub fn accounts(&self) -> Vec<Account> {
        let mut ids = self.list_account_ids();
        ids.dedup();
        ids.into_iter().filter_map(|id| self.account(id)).collect()
    }

    /// Blank draft carrying a fresh id.
    pub fn new_draft(&self) -> Result<AccountDraft, ValidationError> {
        Ok(AccountDraft::new(self.next_account_id()?))
    }

    /// Stored values of `id` as an editable draft.
    pub fn draft(&self, id: AccountId) -> AccountDraft {
        let value = |field: &str| self.field(id, field).unwrap_or_default();
        let provider = value(ProviderCode::FIELD);
        let listed_provider = self
            .field(id, LISTED_PROVIDER_FIELD)
            .unwrap_or_else(|| provider.clone());
        let custom_provider = if listed_provider == ProviderCode::CUSTOM {
            provider
        } else {
            String::new()
        };

        AccountDraft {
            id,
            label: value(Label::FIELD),
            listed_provider,
            custom_provider,
            display_provider: value(DISPLAY_PROVIDER_FIELD),
            username: value(Username::FIELD),
            password: value(Password::FIELD),
        }
    }

    /// Persist a complete draft, replacing any stored values for its id.
    pub fn save(&mut self, draft: &AccountDraft) -> Result<Account, ValidationError> {
        let account = draft.to_account()?;
        let id = account.id;

        self.store.set(&key(id, Label::FIELD), account.label.as_str());
        self.store
            .set(&key(id, ProviderCode::FIELD), account.provider.as_str());
        self.store
            .set(&key(id, LISTED_PROVIDER_FIELD), &draft.listed_provider);
        self.store.set(
            &key(id, DISPLAY_PROVIDER_FIELD),
            account.display_provider.as_deref().unwrap_or_default(),
        );
        self.store
            .set(&key(id, Username::FIELD), account.username.as_str());
        self.store
            .set(&key(id, Password::FIELD), account.password.as_str());
        self.store.remove(&key(id, COOKIES_FIELD));

        tracing::debug!(account = %id, "saved account");
        Ok(account)
    }

    /// Remove every stored value of `id`.
    pub fn delete(&mut self, id: AccountId) {
        for field in [
            Label::FIELD,
            ProviderCode::FIELD,
            LISTED_PROVIDER_FIELD,
            DISPLAY_PROVIDER_FIELD,
            Username::FIELD,
            Password::FIELD,
            COOKIES_FIELD,
        ] {
            self.store.remove(&key(id, field));
        }
        tracing::debug!(account = %id, "deleted account");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<AccountId> {
        values.iter().copied().map(AccountId::new).collect()
    }

    fn stored_account(id: u32, provider: &str) -> Vec<(String, String)> {
        vec![
            (format!("account_{id}_label"), format!("Account {id}")),
            (format!("account_{id}_provider"), provider.to_owned()),
            (format!("account_{id}_username"), format!("user{id}")),
            (format!("account_{id}_password"), "secret".to_owned()),
        ]
    }

    #[test]
    fn account_ids_are_ordered_numerically() {
        let store = MemoryStore::from_iter([
            ("account_10_label", "ten"),
            ("account_2_label", "two"),
            ("account_1_label", "one"),
            ("account_1_username", "u"),
            ("unrelated", "x"),
        ]);
        let registry = AccountRegistry::new(store);
        assert_eq!(registry.list_account_ids(), ids(&[1, 2, 10]));
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let store = MemoryStore::from_iter([
            ("account_x_label", "bad"),
            ("account__label", "bad"),
            ("account_3_label", "ok"),
        ]);
        let registry = AccountRegistry::new(store);
        assert_eq!(registry.list_account_ids(), ids(&[3]));
    }

    #[test]
    fn next_account_id_is_one_past_the_maximum() {
        let empty = AccountRegistry::new(MemoryStore::new());
        assert_eq!(empty.next_account_id(), Ok(AccountId::new(1)));

        let store = MemoryStore::from_iter([
            ("account_1_label", "a"),
            ("account_3_label", "b"),
            ("account_5_label", "c"),
        ]);
        assert_eq!(
            AccountRegistry::new(store).next_account_id(),
            Ok(AccountId::new(6))
        );
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let store = MemoryStore::from_iter([
            ("account_1_label", "a"),
            ("account_4294967295_label", "last"),
        ]);
        let registry = AccountRegistry::new(store);
        assert_eq!(
            registry.next_account_id(),
            Err(ValidationError::AccountIdsExhausted)
        );
        assert_eq!(
            registry.new_draft().unwrap_err(),
            ValidationError::AccountIdsExhausted
        );
    }

    #[test]
    fn duplicate_ids_are_handled_deterministically() {
        let store = MemoryStore::from_iter([("account_2_label", "a"), ("account_02_label", "b")]);
        let registry = AccountRegistry::new(store);
        assert_eq!(registry.list_account_ids(), ids(&[2, 2]));
        assert_eq!(registry.next_account_id(), Ok(AccountId::new(3)));
    }

    #[test]
    fn accounts_load_each_id_once() {
        let mut entries = stored_account(2, "o2");
        entries.push(("account_02_label".to_owned(), "alias".to_owned()));
        let registry = AccountRegistry::new(MemoryStore::from_iter(entries));

        assert_eq!(registry.list_account_ids(), ids(&[2, 2]));
        let accounts = registry.accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, AccountId::new(2));
    }

    #[test]
    fn provider_lookup_scans_provider_keys_only() {
        let mut entries = stored_account(1, "o2");
        entries.push(("account_1_displayprov".to_owned(), "v".to_owned()));
        let registry = AccountRegistry::new(MemoryStore::from_iter(entries));

        assert!(registry.is_provider_configured("o2"));
        assert!(!registry.is_provider_configured("v"));
    }

    #[test]
    fn accounts_skip_incomplete_records() {
        let mut entries = stored_account(2, "o2");
        entries.extend(stored_account(1, "v"));
        entries.push(("account_7_label".to_owned(), "half done".to_owned()));
        let registry = AccountRegistry::new(MemoryStore::from_iter(entries));

        let accounts = registry.accounts();
        assert_eq!(
            accounts.iter().map(|it| it.id).collect::<Vec<_>>(),
            ids(&[1, 2])
        );
        assert_eq!(accounts[0].provider.as_str(), "v");
        assert_eq!(accounts[1].username.as_str(), "user2");
        assert!(registry.account(AccountId::new(7)).is_none());
    }

    #[test]
    fn save_and_reload_custom_provider() {
        let mut registry = AccountRegistry::new(MemoryStore::new());
        let mut draft = registry.new_draft().unwrap();
        assert_eq!(draft.id, AccountId::new(1));

        draft.label = "Work".to_owned();
        draft.listed_provider = ProviderCode::CUSTOM.to_owned();
        draft.custom_provider = "x9".to_owned();
        draft.username = "0851111111".to_owned();
        draft.password = "pw".to_owned();
        let saved = registry.save(&draft).unwrap();
        assert_eq!(saved.provider.as_str(), "x9");

        assert_eq!(registry.draft(AccountId::new(1)), draft);
        assert!(registry.is_provider_configured("x9"));
        assert_eq!(registry.next_account_id(), Ok(AccountId::new(2)));
    }

    #[test]
    fn save_rejects_incomplete_draft() {
        let mut registry = AccountRegistry::new(MemoryStore::new());
        let draft = AccountDraft {
            label: "Only label".to_owned(),
            ..registry.new_draft().unwrap()
        };
        assert!(registry.save(&draft).is_err());
        assert!(registry.list_account_ids().is_empty());
    }

    #[test]
    fn save_clears_cookies_and_delete_removes_everything() {
        let mut entries = stored_account(4, "o2");
        entries.push(("account_4_cookies".to_owned(), "session=1".to_owned()));
        let mut registry = AccountRegistry::new(MemoryStore::from_iter(entries));

        let draft = registry.draft(AccountId::new(4));
        assert_eq!(draft.listed_provider, "o2");
        registry.save(&draft).unwrap();
        assert_eq!(registry.store().get("account_4_cookies"), None);

        registry.delete(AccountId::new(4));
        assert!(registry.store().keys().is_empty());
    }
}
