//! Shared fixtures: a canned landing page, its script, and stub fetchers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use wtm_factor::{Error, Fetch, Result};

pub const BASE_URL: &str = "https://wtm.test";
pub const SCRIPT_URL: &str = "https://wtm.test/assets/application-5e0c1f9a77d2.js";

pub const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>GPU mining profitability</title>
  <link rel="stylesheet" media="all" href="/assets/application-77ab.css">
  <script src="/assets/application-5e0c1f9a77d2.js"></script>
</head>
<body>
<form action="/coins" method="get">
  <div class="form-row">
    <div class="col-md-2 py-1">
      <label class="ck-button"><input type="checkbox" name="x11" checked>
        <span class="btn btn-default btn-block mb-1">X11</span></label>
      <div class="input-group input-group-sm">
        <input type="text" class="form-control" id="factor_x11_hr" name="factor[x11_hr]" value="22.5">
        <div class="input-group-append"><span class="input-group-text">Mh/s</span></div>
      </div>
      <div class="input-group input-group-sm">
        <input type="text" class="form-control" id="factor_x11_p" name="factor[x11_p]" value="1.0">
        <div class="input-group-append"><span class="input-group-text">W</span></div>
      </div>
    </div>
    <div class="col-md-2 py-1">
      <label class="ck-button"><input type="checkbox" name="lrev2">
        <span class="btn btn-default btn-block mb-1">
          Lyra2REv2
        </span></label>
      <div class="input-group input-group-sm">
        <input type="text" class="form-control" id="factor_lrev2_hr" name="factor[lrev2_hr]" value="44">
        <div class="input-group-append"><span class="input-group-text">kh/s</span></div>
      </div>
      <div class="input-group input-group-sm">
        <input type="text" class="form-control" id="factor_lrev2_p" name="factor[lrev2_p]" value="290">
        <div class="input-group-append"><span class="input-group-text">W</span></div>
      </div>
    </div>
  </div>
</form>
</body>
</html>"#;

pub const SCRIPT: &str = concat!(
    r#"!function(t){"use strict";var e=t.jQuery,n=.5;"#,
    r##"m={"#factor_x11_hr":10.5,"#factor_x11_p":.25,"#factor_lrev2_hr":20,"#factor_lrev2_p":85,"#factor_ghost_hr":3},"##,
    r##"l={"#factor_x11_hr":1.5,"#factor_x11_p":.5,"#factor_lrev2_hr":4,"#factor_lrev2_p":120,"#factor_ghost_hr":9},"##,
    r##"_={"#factor_x11_hr":60,"#factor_x11_p":1.5,"#factor_lrev2_hr":100,"#factor_lrev2_p":250},"##,
    r#"r=Object.keys(v);e(function(){r.forEach(function(t){})})}(window);"#
);

/// Serves canned bodies and records every requested URL.
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The landing page and its script.
    pub fn site() -> Self {
        Self::new().with(BASE_URL, LANDING_PAGE).with(SCRIPT_URL, SCRIPT)
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl Fetch for StubFetcher {
    fn get(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| Error::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Fails every request like a dropped connection.
pub struct OfflineFetcher;

impl Fetch for OfflineFetcher {
    fn get(&self, url: &str) -> Result<String> {
        Err(Error::Transport {
            url: url.to_string(),
            message: "operation timed out".to_string(),
        })
    }
}

pub fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}
