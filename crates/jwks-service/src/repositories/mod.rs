pub mod signing_keys;
