pub mod match_state;
