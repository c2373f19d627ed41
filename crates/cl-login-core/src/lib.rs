//! Interaction logic for the Capitalisk login widgets.
//!
//! Everything here is DOM-free: the browser layer feeds input events in and
//! renders the resulting state, dispatching the returned [`LoginEvent`]s.

pub mod events;
pub mod login;
pub mod passphrase;
pub mod show_hide;

pub use events::{LoginError, LoginEvent};
pub use login::{AddressInput, Checkbox, Indicator, LoginForm, LoginOptions};
pub use passphrase::{KeyDownOutcome, KeyPress, KeyUpOutcome, PassphraseGrid};
