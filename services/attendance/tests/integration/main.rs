mod approval_test;
mod provisioning_test;
mod roster_test;
mod window_test;
