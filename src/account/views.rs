//! Bare static forms for the GET endpoints.

pub const REGISTER_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Register</title></head>
<body>
<h1>Register</h1>
<form method="post" action="/Account/Register">
  <input name="username" placeholder="Username" required>
  <input name="password" type="password" placeholder="Password" required>
  <input name="first_name" placeholder="First name">
  <input name="last_name" placeholder="Last name">
  <input name="address" placeholder="Address">
  <input name="phone" placeholder="Phone">
  <button type="submit">Register</button>
</form>
</body>
</html>
"#;

pub const LOGIN_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Login</title></head>
<body>
<h1>Login</h1>
<form method="post" action="/Account/Login">
  <input name="username" placeholder="Username" required>
  <input name="password" type="password" placeholder="Password" required>
  <label><input name="remember_me" type="checkbox"> Remember me</label>
  <button type="submit">Login</button>
</form>
</body>
</html>
"#;
