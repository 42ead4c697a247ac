// Winks Companion Engine — replica provisioning and chat dispatch
// One HTTP boundary (sensay), pure context assembly (context), and the two
// organisms the UI calls into (provisioner, dispatcher).

pub mod context;
pub mod dispatcher;
pub mod http;
pub mod provisioner;
pub mod sensay;
