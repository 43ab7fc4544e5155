//! Playwright project scaffolding
//!
//! Emits a ready-to-install `e2e/` directory: runner config, manifest, a
//! sample fixture, page object and test, and an ignore list. The base URL
//! is the only interpolated value.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use e2e_mcp_common::{E2E_DIR, REPORT_DIR, RESULTS_DIR};

use crate::error::{E2eError, E2eResult};

/// Target URL used when none is given
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Subdirectories created under `e2e/`
pub const SCAFFOLD_DIRS: [&str; 5] = ["fixtures", "pages", "tests", "utils", "reports"];

const BASE_URL_PLACEHOLDER: &str = "__BASE_URL__";

const PLAYWRIGHT_CONFIG: &str = r#"import { defineConfig, devices } from '@playwright/test'

export default defineConfig({
  testDir: './tests',
  fullyParallel: true,
  forbidOnly: !!process.env.CI,
  retries: process.env.CI ? 2 : 1,
  workers: process.env.CI ? 4 : undefined,

  // Console, HTML and JSON reporters at once
  reporter: [
    ['list'],
    ['html', { outputFolder: 'playwright-report', open: 'never' }],
    ['json', { outputFile: 'test-results.json' }],
  ],

  outputDir: 'test-results',

  timeout: 60000,
  expect: { timeout: 5000 },

  use: {
    baseURL: '__BASE_URL__',
    trace: 'on-first-retry',
    screenshot: 'only-on-failure',
    video: 'retain-on-failure',
  },

  projects: [
    {
      name: 'chromium',
      use: { ...devices['Desktop Chrome'] },
    },
  ],
})
"#;

const TEST_DATA: &str = r#"// Test data. Adjust to the application under test.

export const testUser = {
  username: 'testuser',
  password: '123456',
}

export const testAdmin = {
  username: 'admin',
  password: 'admin123',
}

export const apiConfig = {
  baseUrl: process.env.API_URL || 'http://localhost:8080',
}
"#;

const EXAMPLE_PAGE: &str = r#"import { Page, Locator, expect } from '@playwright/test'

/**
 * Example page object. Adapt it to a real page.
 */
export class ExamplePage {
  readonly page: Page
  readonly heading: Locator

  constructor(page: Page) {
    this.page = page
    this.heading = page.locator('h1')
  }

  async goto() {
    await this.page.goto('/')
    await expect(this.heading).toBeVisible()
  }

  async getTitle(): Promise<string> {
    return await this.page.title()
  }
}
"#;

const EXAMPLE_TEST: &str = r#"import { test, expect } from '@playwright/test'
import { ExamplePage } from '../pages/example.page'

test.describe('example', () => {
  test('has a title', async ({ page }) => {
    const examplePage = new ExamplePage(page)
    await examplePage.goto()

    const title = await examplePage.getTitle()
    expect(title).toBeTruthy()
  })

  test('loads without error', async ({ page }) => {
    await page.goto('/')
    await expect(page).not.toHaveURL(/error/)
  })
})
"#;

/// Files and directories written by [`scaffold_project`]
#[derive(Debug, Clone)]
pub struct ProjectScaffold {
    pub e2e_dir: PathBuf,
    pub base_url: String,
    pub files: Vec<PathBuf>,
}

/// Create `<project_dir>/e2e` with a sample Playwright project.
///
/// `project_dir` must already exist. Existing files are overwritten.
pub fn scaffold_project(project_dir: &Path, base_url: &str) -> E2eResult<ProjectScaffold> {
    if !project_dir.is_dir() {
        return Err(E2eError::ProjectDirMissing(project_dir.to_path_buf()));
    }

    let e2e_dir = project_dir.join(E2E_DIR);
    info!("Scaffolding Playwright project in {}", e2e_dir.display());

    for dir in SCAFFOLD_DIRS {
        let path = e2e_dir.join(dir);
        std::fs::create_dir_all(&path).map_err(|source| E2eError::Scaffold {
            path: path.clone(),
            source,
        })?;
    }

    let artifacts = [
        (
            "playwright.config.ts",
            PLAYWRIGHT_CONFIG.replace(BASE_URL_PLACEHOLDER, base_url),
        ),
        ("package.json", package_json()?),
        ("fixtures/test-data.ts", TEST_DATA.to_string()),
        ("pages/example.page.ts", EXAMPLE_PAGE.to_string()),
        ("tests/example.spec.ts", EXAMPLE_TEST.to_string()),
        (".gitignore", gitignore()),
    ];

    let mut files = Vec::with_capacity(artifacts.len());
    for (relative, content) in artifacts {
        let path = e2e_dir.join(relative);
        debug!("Writing {}", path.display());
        std::fs::write(&path, content).map_err(|source| E2eError::Scaffold {
            path: path.clone(),
            source,
        })?;
        files.push(path);
    }

    Ok(ProjectScaffold {
        e2e_dir,
        base_url: base_url.to_string(),
        files,
    })
}

fn package_json() -> E2eResult<String> {
    let manifest = serde_json::json!({
        "name": "e2e-tests",
        "version": "1.0.0",
        "scripts": {
            "test": "playwright test",
            "test:headed": "playwright test --headed",
            "test:debug": "playwright test --debug",
            "test:ui": "playwright test --ui",
            "report": "playwright show-report"
        },
        "devDependencies": {
            "@playwright/test": "^1.40.0",
            "@types/node": "^20.10.0"
        }
    });
    Ok(serde_json::to_string_pretty(&manifest)?)
}

fn gitignore() -> String {
    format!(
        "node_modules/\n{RESULTS_DIR}/\n{REPORT_DIR}/\ntest-results.json\nblob-report/\n.auth/\n"
    )
}

impl ProjectScaffold {
    /// Text block with the created tree and next steps
    pub fn render(&self) -> String {
        let dir = self.e2e_dir.display();
        format!(
            "✅ E2E test project initialized!

## Created files
```
{dir}/
├── fixtures/
│   └── test-data.ts      # test data
├── pages/
│   └── example.page.ts   # example page object
├── tests/
│   └── example.spec.ts   # example test
├── utils/
├── reports/
├── playwright.config.ts  # baseURL: {base_url}
└── package.json
```

## Next steps
```bash
cd {dir}
npm install
npx playwright install chromium
npm test
```

## Writing tests
1. Add page objects under `pages/`
2. Add test cases under `tests/`
3. Run them with `npm test` or the `e2e_run` tool",
            base_url = self.base_url,
        )
    }
}
