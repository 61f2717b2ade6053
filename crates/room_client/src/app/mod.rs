pub(crate) mod bootstrap;
pub(crate) mod replay;
pub(crate) mod script;
