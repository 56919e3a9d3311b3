//! Host-side integration tests for the Growlight control core.

mod mock_hw;

mod controller_tests;
mod menu_flow_tests;
