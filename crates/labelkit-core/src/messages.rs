// ── Fallback messages ──
//
// Shown when a failed action carries no server `detail`. English is the
// default; Indonesian matches the service's own wording.

use labelkit_api::LabelKind;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// UI language for fallback messages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

/// A store action that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    ResetPassword,
    FetchProfile,
    UpdateProfile,
    CreateLabel(LabelKind),
    FetchLabels(LabelKind),
    FetchForPrint(LabelKind),
    FetchPreview(LabelKind),
    DeleteLabel(LabelKind),
    BulkDelete(LabelKind),
}

impl Action {
    /// Generic message for this action in `locale`.
    pub fn fallback(self, locale: Locale) -> String {
        match locale {
            Locale::En => self.english(),
            Locale::Id => self.indonesian(),
        }
    }

    fn english(self) -> String {
        let noun = |kind| match kind {
            LabelKind::Generic => "label",
            LabelKind::Shipping => "shipping label",
        };
        match self {
            Self::Login => "Login failed".into(),
            Self::Register => "Registration failed".into(),
            Self::ResetPassword => "Password reset failed".into(),
            Self::FetchProfile => "Failed to load profile".into(),
            Self::UpdateProfile => "Failed to update profile".into(),
            Self::CreateLabel(k) => format!("Failed to create {}", noun(k)),
            Self::FetchLabels(k) => format!("Failed to load {}s", noun(k)),
            Self::FetchForPrint(k) => format!("Failed to load {} for printing", noun(k)),
            Self::FetchPreview(k) => format!("Failed to load {} preview", noun(k)),
            Self::DeleteLabel(k) => format!("Failed to delete {}", noun(k)),
            Self::BulkDelete(k) => format!("Failed to delete {}s", noun(k)),
        }
    }

    fn indonesian(self) -> String {
        let noun = |kind| match kind {
            LabelKind::Generic => "label",
            LabelKind::Shipping => "label pengiriman",
        };
        match self {
            Self::Login => "Login gagal".into(),
            Self::Register => "Registrasi gagal".into(),
            Self::ResetPassword => "Reset password gagal".into(),
            Self::FetchProfile => "Gagal memuat profil".into(),
            Self::UpdateProfile => "Gagal memperbarui profil".into(),
            Self::CreateLabel(k) => format!("Gagal membuat {}", noun(k)),
            Self::FetchLabels(k) => format!("Gagal memuat {}", noun(k)),
            Self::FetchForPrint(k) => format!("Gagal memuat data {} untuk print", noun(k)),
            Self::FetchPreview(k) => format!("Gagal memuat preview {}", noun(k)),
            Self::DeleteLabel(k) => format!("Gagal menghapus {}", noun(k)),
            Self::BulkDelete(k) => format!("Gagal menghapus beberapa {}", noun(k)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("ID".parse::<Locale>().unwrap(), Locale::Id);
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(Locale::Id.to_string(), "id");
    }

    #[test]
    fn shipping_messages_name_the_category() {
        assert_eq!(
            Action::CreateLabel(LabelKind::Shipping).fallback(Locale::Id),
            "Gagal membuat label pengiriman"
        );
        assert_eq!(
            Action::FetchLabels(LabelKind::Shipping).fallback(Locale::En),
            "Failed to load shipping labels"
        );
    }

    #[test]
    fn session_messages() {
        assert_eq!(Action::Login.fallback(Locale::Id), "Login gagal");
        assert_eq!(Action::Register.fallback(Locale::En), "Registration failed");
    }
}
