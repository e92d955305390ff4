pub(crate) mod oauth_controller;
