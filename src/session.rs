//! Form state for one payment-code session

use crate::link::{self, PaymentLink, ValidationError};
use crate::output::{Notification, NotificationKind};
use crate::qr::{BarcodeRenderer, RenderedBarcode};

/// A successfully encoded link together with its barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// The encoded deep-link
    pub link: PaymentLink,
    /// Its rendered barcode
    pub barcode: RenderedBarcode,
}

/// Input fields plus the last generated code.
///
/// The generated code reflects the last pair that passed validation, which may
/// differ from what the fields hold now.
#[derive(Debug, Clone, Default)]
pub struct Session {
    identifier: String,
    amount: String,
    generated: Option<GeneratedCode>,
    renderer: BarcodeRenderer,
}

impl Session {
    /// Empty fields, nothing generated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current identifier field.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current amount field.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Replace the identifier field. Any text is accepted.
    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    /// Replace the amount field. Any text is accepted.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Last generated code, if any.
    pub fn generated(&self) -> Option<&GeneratedCode> {
        self.generated.as_ref()
    }

    /// Currently displayed barcode, if any.
    pub fn barcode(&self) -> Option<&RenderedBarcode> {
        self.generated.as_ref().map(|code| &code.barcode)
    }

    /// Encode the current fields and, on success, replace the displayed code.
    ///
    /// Returns the notification to show. State is untouched on failure.
    pub fn generate(&mut self) -> Notification {
        match self.try_generate() {
            Ok(_) => Notification::new(NotificationKind::Generated),
            Err(crate::Error::Validation(ValidationError::MissingIdentifier)) => {
                Notification::new(NotificationKind::MissingIdentifier)
            }
            Err(crate::Error::Validation(ValidationError::InvalidAmount(_))) => {
                Notification::new(NotificationKind::InvalidAmount)
            }
            Err(err) => {
                // Valid link the QR encoder still rejected, e.g. too long for any version
                tracing::warn!("Failed to render payment QR code: {err}");
                Notification::new(NotificationKind::GenerateFailed)
            }
        }
    }

    /// Encode the current fields, returning the new code or the reason it was rejected.
    pub fn try_generate(&mut self) -> crate::Result<&GeneratedCode> {
        let link = link::encode(&self.identifier, &self.amount).inspect_err(|err| {
            tracing::info!(reason = %err, "Rejected payment details");
        })?;
        let barcode = self.renderer.render(&link)?;

        tracing::info!(link = %link, modules = barcode.width(), "Generated payment QR code");
        let code = self.generated.insert(GeneratedCode { link, barcode });
        Ok(&*code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.identifier(), "");
        assert_eq!(session.amount(), "");
        assert!(session.generated().is_none());
    }

    #[test]
    fn test_generate_success() {
        let mut session = Session::new();
        session.set_identifier("alice@bank");
        session.set_amount("250");

        let notification = session.generate();
        assert_eq!(notification.kind, NotificationKind::Generated);
        let code = session.generated().unwrap();
        assert_eq!(
            code.link.as_str(),
            "upi://pay?pa=alice%40bank&am=250&cu=INR&tn=Payment"
        );
        assert!(session.barcode().is_some());
    }

    #[test]
    fn test_failed_generate_keeps_previous_code() {
        let mut session = Session::new();
        session.set_identifier("alice@bank");
        session.set_amount("250");
        session.generate();
        let before = session.generated().cloned();

        session.set_amount("-10");
        assert_eq!(session.generate().kind, NotificationKind::InvalidAmount);
        assert_eq!(session.generated().cloned(), before);

        session.set_identifier("   ");
        assert_eq!(session.generate().kind, NotificationKind::MissingIdentifier);
        assert_eq!(session.generated().cloned(), before);
        // Fields keep the edits even though the code did not change
        assert_eq!(session.amount(), "-10");
    }

    #[test]
    fn test_regenerate_replaces_code() {
        let mut session = Session::new();
        session.set_identifier("alice@bank");
        session.set_amount("250");
        session.generate();
        session.set_amount("300");
        session.generate();
        assert!(session.generated().unwrap().link.as_str().contains("am=300&"));
    }

    #[test]
    fn test_oversized_link_reports_generate_failed() {
        let mut session = Session::new();
        session.set_identifier("alice@bank");
        session.set_amount("250");
        session.generate();
        let before = session.generated().cloned();
        assert!(before.is_some());

        // Validates, but no QR version holds a 5000-byte payload
        session.set_identifier("a".repeat(5000));
        assert_eq!(session.generate().kind, NotificationKind::GenerateFailed);
        assert_eq!(session.generated().cloned(), before);
        assert!(matches!(session.try_generate(), Err(crate::Error::QrEncode(_))));
    }

    #[test]
    fn test_missing_identifier_wins_over_bad_amount() {
        let mut session = Session::new();
        session.set_amount("abc");
        assert_eq!(session.generate().kind, NotificationKind::MissingIdentifier);
        assert!(session.generated().is_none());
    }
}
