pub mod errors;
pub mod db;
pub mod system_role;

#[cfg(test)]
mod tests;
