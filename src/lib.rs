pub mod app_state;
pub mod camera;
pub mod fixer;
pub mod settings;
pub mod solar;

#[cfg(test)]
mod test_http;
