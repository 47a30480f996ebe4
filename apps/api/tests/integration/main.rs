mod helpers;
mod test_health;
mod test_upload;
