//! Notification kinds and the kind-to-handler-name table.

use std::fmt;

/// A mailbox-change event category delivered by the push transport.
///
/// Each kind maps 1:1 to a named handler method on the subscriber. The
/// mapping is fixed; routing a notification means looking up the handler
/// registered for its kind, never matching on payload contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Any change to the watched mailbox (history record advanced).
    MailboxChanged,
    /// A new message arrived.
    NewEmail,
    /// A new conversation thread started.
    NewThread,
    /// A label was added to a message.
    EmailLabelAdded,
    /// A message was starred.
    EmailStarred,
    /// A label was removed from a message.
    EmailLabelRemoved,
    /// A star was removed from a message.
    EmailStarRemoved,
    /// A new attachment arrived.
    NewAttachment,
}

impl NotificationKind {
    /// All kinds, in declared order.
    ///
    /// Declared order is also the order capability introspection reports
    /// handler names in.
    pub const ALL: [Self; 8] = [
        Self::MailboxChanged,
        Self::NewEmail,
        Self::NewThread,
        Self::EmailLabelAdded,
        Self::EmailStarred,
        Self::EmailLabelRemoved,
        Self::EmailStarRemoved,
        Self::NewAttachment,
    ];

    /// Canonical subscriber handler method name for this kind.
    #[must_use]
    pub const fn handler_name(self) -> &'static str {
        match self {
            Self::MailboxChanged => "onMailboxChanges",
            Self::NewEmail => "onNewEmail",
            Self::NewThread => "onNewThread",
            Self::EmailLabelAdded => "onEmailLabelAdded",
            Self::EmailStarred => "onEmailStarred",
            Self::EmailLabelRemoved => "onEmailLabelRemoved",
            Self::EmailStarRemoved => "onEmailStarRemoved",
            Self::NewAttachment => "onNewAttachment",
        }
    }

    /// Legacy handler method name, where a second historical spelling exists.
    ///
    /// Four kinds were published under two names by different adaptor
    /// generations. Both spellings register the same callback; capability
    /// introspection always reports the canonical name.
    #[must_use]
    pub const fn legacy_handler_name(self) -> Option<&'static str> {
        match self {
            Self::EmailLabelAdded => Some("onNewLabeledEmail"),
            Self::EmailStarred => Some("onNewStaredEmail"),
            Self::EmailLabelRemoved => Some("onLabelRemovedEmail"),
            Self::EmailStarRemoved => Some("onStarRemovedEmail"),
            _ => None,
        }
    }

    /// Diagnostic entry-point tag recorded on each invocation span.
    #[must_use]
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::MailboxChanged => "callOnMailboxChanges",
            Self::NewEmail => "callOnNewEmail",
            Self::NewThread => "callOnNewThread",
            Self::EmailLabelAdded => "callOnEmailLabelAdded",
            Self::EmailStarred => "callOnEmailStarred",
            Self::EmailLabelRemoved => "callOnEmailLabelRemoved",
            Self::EmailStarRemoved => "callOnEmailStarRemoved",
            Self::NewAttachment => "callOnNewAttachment",
        }
    }

    /// Resolves a handler method name (canonical or legacy) to its kind.
    #[must_use]
    pub fn from_handler_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            kind.handler_name() == name || kind.legacy_handler_name() == Some(name)
        })
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MailboxChanged => "mailbox-changed",
            Self::NewEmail => "new-email",
            Self::NewThread => "new-thread",
            Self::EmailLabelAdded => "email-label-added",
            Self::EmailStarred => "email-starred",
            Self::EmailLabelRemoved => "email-label-removed",
            Self::EmailStarRemoved => "email-star-removed",
            Self::NewAttachment => "new-attachment",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod handler_name_tests {
        use super::*;

        #[test]
        fn all_names_are_distinct() {
            let mut names: Vec<_> = NotificationKind::ALL
                .iter()
                .map(|k| k.handler_name())
                .collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), NotificationKind::ALL.len());
        }

        #[test]
        fn new_email_name() {
            assert_eq!(NotificationKind::NewEmail.handler_name(), "onNewEmail");
        }

        #[test]
        fn mailbox_changed_name() {
            assert_eq!(
                NotificationKind::MailboxChanged.handler_name(),
                "onMailboxChanges"
            );
        }
    }

    mod legacy_name_tests {
        use super::*;

        #[test]
        fn only_label_and_star_kinds_have_legacy_names() {
            let with_legacy: Vec<_> = NotificationKind::ALL
                .into_iter()
                .filter(|k| k.legacy_handler_name().is_some())
                .collect();
            assert_eq!(
                with_legacy,
                vec![
                    NotificationKind::EmailLabelAdded,
                    NotificationKind::EmailStarred,
                    NotificationKind::EmailLabelRemoved,
                    NotificationKind::EmailStarRemoved,
                ]
            );
        }

        #[test]
        fn starred_legacy_spelling() {
            assert_eq!(
                NotificationKind::EmailStarred.legacy_handler_name(),
                Some("onNewStaredEmail")
            );
        }
    }

    mod from_handler_name_tests {
        use super::*;

        #[test]
        fn resolves_canonical_name() {
            assert_eq!(
                NotificationKind::from_handler_name("onNewThread"),
                Some(NotificationKind::NewThread)
            );
        }

        #[test]
        fn resolves_legacy_name() {
            assert_eq!(
                NotificationKind::from_handler_name("onLabelRemovedEmail"),
                Some(NotificationKind::EmailLabelRemoved)
            );
        }

        #[test]
        fn unknown_name_is_none() {
            assert_eq!(NotificationKind::from_handler_name("onCalendarEvent"), None);
        }
    }

    #[test]
    fn entry_point_matches_handler_name() {
        for kind in NotificationKind::ALL {
            let expected = kind.handler_name().replacen("on", "callOn", 1);
            assert_eq!(kind.entry_point(), expected);
        }
    }

    #[test]
    fn display_is_kebab_case() {
        assert_eq!(NotificationKind::EmailStarRemoved.to_string(), "email-star-removed");
    }
}
