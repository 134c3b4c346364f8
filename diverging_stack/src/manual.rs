/*!

This is the long-form manual for `diverging_stack` and `biaschart`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values, with a header row
* `xlsx` Excel spreadsheet, the first row being the header

Both formats expect one row per speaker and ruling, with three columns:

| speaker        | ruling       | count |
|----------------|--------------|-------|
| Jane Doe       | pants-fire   | 4     |
| Jane Doe       | barely-true  | 2     |
| Jane Doe       | true         | 9     |

The columns are found by name, so they may come in any order and other columns are ignored.
The names can be changed in the configuration (`speakerColumn`, `rulingColumn`, `countColumn`).

Rows whose ruling is not part of the taxonomy are silently skipped, even when their count cell is empty,
malformed or missing (with the default taxonomy, `full-flop` or `no-flip` for instance).

## Taxonomy

By default the PolitiFact Truth-O-Meter is used:

| ruling         | category         | side     |
|----------------|------------------|----------|
| `pants-fire`   | `Pants on fire!` | negative |
| `false`        | `False`          | negative |
| `mostly-false` | `Mostly false`   | negative |
| `barely-true`  | `Mostly false`   | negative |
| `half-true`    | `Half true`      | positive |
| `mostly-true`  | `Mostly true`    | positive |
| `true`         | `True`           | positive |

`barely-true` is the former name of `mostly-false`, both are counted together.

## Chart

For every speaker, counts are turned into shares of the speaker's total. Negative categories
are stacked to the left of zero, the least severe one closest to zero. Positive categories are
stacked to the right. Speakers are sorted by bias, the (negated) share of negative
categories, so that the speakers with the most falsehoods are at the top.

## Configuration file

The configuration is a JSON file. All the sections are optional:

```json
{
  "outputSettings": {
    "outputPath": "chart.svg",
    "summaryPath": "summary.json",
    "chartTitle": "Truthfulness of statements",
    "width": 928,
    "rowHeight": 33,
    "showLegend": true
  },
  "inputSources": [
    {
      "provider": "csv",
      "filePath": "politifact.csv",
      "speakerColumn": "speaker",
      "rulingColumn": "ruling",
      "countColumn": "count"
    }
  ],
  "categories": {
    "rulings": [
      { "ruling": "pants-fire", "label": "Pants on fire!" },
      { "ruling": "true", "label": "True", "color": "#3288bd" }
    ],
    "negatives": ["Pants on fire!"],
    "positives": ["True"]
  },
  "labels": {
    "negative": "← More falsehoods",
    "positive": "More truths →"
  }
}
```

Paths are relative to the directory of the configuration file. Command line options take
precedence over the configuration file.

*/
