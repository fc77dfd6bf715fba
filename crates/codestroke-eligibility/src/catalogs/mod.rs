pub mod thrombolysis;
