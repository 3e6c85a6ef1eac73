pub mod auth;
pub mod dashboard;

#[cfg(test)]
mod test_util;
