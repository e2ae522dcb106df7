#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use heritage_core::{Catalog, Config, ManualScheduler, Session};

/// Four items, two of them in "history"; only one history item mentions a wall.
pub const SMALL_CATALOG: &str = r#"
[[item]]
id = 10
kind = "site"
category = "history"
title = "Old City Wall"
description = "Stone fortifications."
duration = "2:00"
media = "wall.mp3"

[[item]]
id = 11
kind = "narration"
category = "history"
title = "Market Days"
description = "Trade along the caravan routes."
narrator = "Elder Ahmed"
duration = "3:20"
media = "market.mp3"

[[item]]
id = 12
kind = "narration"
category = "culture"
title = "Wall Paintings"
description = "Colours of the old houses."
narrator = "Mother Zeynab"
duration = "1:40"
media = "paint.mp3"

[[item]]
id = 13
kind = "site"
category = "religious"
title = "Shrine of the Hill"
description = "A quiet place of prayer."
duration = "4:00"
media = "shrine.mp3"

[[slide]]
title = "One"
image = "1.jpg"

[[slide]]
title = "Two"
image = "2.jpg"

[[slide]]
title = "Three"
image = "3.jpg"

[[slide]]
title = "Four"
image = "4.jpg"
"#;

pub struct Harness {
    pub session: Session,
    pub clock: ManualScheduler,
}

impl Harness {
    pub fn small() -> Self {
        Self::with_catalog(Catalog::from_toml_str(SMALL_CATALOG).expect("small catalog"))
    }

    pub fn bundled() -> Self {
        Self::with_catalog(Catalog::bundled().expect("bundled catalog"))
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::with_config(catalog, &Config::default())
    }

    pub fn with_config(catalog: Catalog, config: &Config) -> Self {
        let clock = ManualScheduler::new();
        let session = Session::with_synthetic(Arc::new(catalog), config, Arc::new(clock.clone()));
        Self { session, clock }
    }

    /// Move the fake clock and deliver every firing to the session.
    pub fn advance(&mut self, by: Duration) {
        for tag in self.clock.advance(by) {
            self.session.handle_timer(tag);
        }
    }

    pub fn advance_secs(&mut self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}
