mod fixtures;
mod resolver;

static_assertions::assert_impl_all!(session_id::AttributeStore: Send, Sync, Clone);
static_assertions::assert_impl_all!(session_id::SessionResolver: Send, Sync);
static_assertions::assert_impl_all!(session_id::RequestVars: Send, Sync);
