pub mod lenient_string;
