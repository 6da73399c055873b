mod scenario_tests;
mod text_tests;
