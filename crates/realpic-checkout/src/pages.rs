//! Callback pages PayPal redirects the buyer to
//!
//! The app watches for these URLs; the pages only need to tell a human
//! what happened.

pub const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Payment complete</title>
</head>
<body style="font-family: sans-serif; text-align: center; padding-top: 4rem;">
  <h1>Payment complete</h1>
  <p>You can return to RealPic.</p>
</body>
</html>
"#;

pub const CANCEL_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Payment cancelled</title>
</head>
<body style="font-family: sans-serif; text-align: center; padding-top: 4rem;">
  <h1>Payment cancelled</h1>
  <p>Nothing was charged. You can return to RealPic.</p>
</body>
</html>
"#;
