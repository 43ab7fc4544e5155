//! Built-in prompts
//!
//! Knowledge an agent needs but cannot infer from the project: the tool
//! workflow, selector strategy for component-library DOMs, and a
//! troubleshooting guide for common Playwright failures.

use serde_json::{json, Value};

/// A static prompt served through `prompts/get`
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

impl Prompt {
    /// `prompts/list` entry
    pub fn listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
        })
    }

    /// `prompts/get` result
    pub fn messages(&self) -> Value {
        json!({
            "description": self.description,
            "messages": [{
                "role": "assistant",
                "content": { "type": "text", "text": self.text },
            }],
        })
    }
}

pub fn builtin_prompts() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "e2e-context",
            description: "General E2E testing context",
            text: E2E_CONTEXT,
        },
        Prompt {
            name: "e2e-debug",
            description: "Troubleshooting guide for failing tests",
            text: E2E_DEBUG,
        },
    ]
}

const E2E_CONTEXT: &str = r#"# E2E Testing Context

## 0. Workflow

```
1. Initialize project  -> e2e_init tool
2. Install deps        -> cd e2e && npm install
3. Install browsers    -> npx playwright install chromium
4. Write tests         -> page objects in pages/, test cases in tests/
5. Run tests           -> e2e_run tool
6. View report         -> e2e_report tool opens the HTML report
```

**Shell commands:**
- `npm install` - install dependencies
- `npx playwright install chromium` - install Chromium
- `npx playwright show-report` - open the HTML report
- `npx playwright test --ui` - Playwright UI mode

**MCP tools:**
- `e2e_init` - scaffold a test project
- `e2e_run` - run tests (also writes the HTML report)
- `e2e_report` - open the HTML report

## 1. Runtime DOM of UI components

Component libraries render wrapper elements, so source and DOM differ:
- inputs usually sit inside an outer wrapper div
- dropdown option lists are usually teleported to the end of body
- dialogs usually have a mask layer and may be teleported too
- toast messages are inserted into body dynamically

**Selector strategy, most stable first:**
```typescript
// Best: semantic attributes and roles
page.locator('[data-testid="login-btn"]')
page.getByRole('button', { name: 'Log in' })
page.getByPlaceholder('Username')

// Good: text content
page.getByText('Welcome back')

// OK: scoped combinations
page.locator('form').filter({ hasText: 'Log in' }).locator('button')

// Avoid: generated ids
page.locator('#el-id-1234')        // Element Plus
page.locator('#rc-tabs-0-tab-1')   // Ant Design
page.locator('#radix-:r0:')        // Radix UI

// Avoid: framework styling classes on their own
page.locator('.ant-btn-primary')
```

## 2. Library fingerprints

- Element Plus: `el-` prefix, ids like `el-id-xxx`, `.el-select-dropdown` teleported
- Ant Design (Vue and React): `ant-` prefix, ids like `rc-xxx`, `.ant-select-dropdown` teleported
- MUI: `Mui` prefix, ids like `:r0:`

Identify the library from package.json (`element-plus`, `ant-design-vue`,
`antd`, `@mui/material`, `@chakra-ui/react`) or from component tags in source.

## 3. Key Playwright APIs

```typescript
await page.waitForLoadState('networkidle')
await expect(locator).toBeVisible({ timeout: 10000 })
page.locator('tr').filter({ hasText: 'row' }).locator('button')
await input.fill('value')
await select.selectOption('value')
await expect(page).toHaveURL('/dashboard')
await expect(locator).toHaveCount(5)
```

## 4. Project layout

```
e2e/
├── pages/       # page objects
├── tests/       # test cases
├── fixtures/    # test data
└── playwright.config.ts
```
"#;

const E2E_DEBUG: &str = r#"# E2E Debugging Guide

## Common failures

### 1. Element not found
```
Timeout waiting for locator
```
Check:
1. Run with `--headed` to see the real page
2. Re-check the selector; components add wrapper elements
3. Wait for loading to finish
4. Check whether the element is inside an iframe

```typescript
await page.waitForLoadState('networkidle')
await expect(locator).toBeVisible()
```

### 2. Element covered
```
Element is not visible / intercepts pointer events
```
Usual causes: dialogs, loading masks, fixed-position elements.
```typescript
await page.locator('.loading').waitFor({ state: 'hidden' })
await locator.click({ force: true })
```

### 3. Inconsistent state
Every test runs in a fresh context and shares no login state. Reuse it
with storageState:
```typescript
await page.context().storageState({ path: 'auth.json' })
test.use({ storageState: 'auth.json' })
```

## Debug commands

```bash
npx playwright test --headed
npx playwright test --debug
npx playwright test --ui
npx playwright test -g "keyword"
```

## Quick inspection

```typescript
await page.pause()
await locator.highlight()
console.log(await locator.textContent())
await page.screenshot({ path: 'debug.png' })
```
"#;
