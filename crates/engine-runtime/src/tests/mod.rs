mod support;
mod trigger;
