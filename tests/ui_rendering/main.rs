mod common;
mod email_flow_test;
mod search_flow_test;
mod sidebar_render_test;
