use crate::api::{ApiCall, RequestId};
use crate::bus::Topic;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue `call` on behalf of `scope`; its completion comes back as
    /// `Msg::ApiCompleted` carrying the same `request`.
    Request {
        request: RequestId,
        scope: ViewScope,
        call: ApiCall,
    },
    /// Announce a mutation to sibling views.
    Publish(Topic),
    /// A view mounted: subscribe it to its topics.
    OpenScope(ViewScope),
    /// A view was torn down: drop its subscriptions and cancel its requests.
    CloseScope(ViewScope),
}

/// Lifetime of a view. Requests and bus subscriptions belong to one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewScope {
    Roster,
    VolunteerEditor,
    JobEditor,
}

impl ViewScope {
    /// Topics the view refetches on.
    pub fn topics(self) -> &'static [Topic] {
        match self {
            ViewScope::Roster => &Topic::ALL,
            ViewScope::VolunteerEditor => &[Topic::VolunteerUpdated, Topic::ShiftUpdated],
            ViewScope::JobEditor => &[],
        }
    }
}
